mod config;
mod routes;
mod serialize;
mod state;

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use state::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bizmeld composite dataset API server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "bizmeld.toml")]
    config: PathBuf,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let port = cli.port.unwrap_or(config.server.port);

    // Ingestion runs to completion before the server binds; the resulting
    // state is immutable for the rest of the process lifetime.
    let output = bizmeld_core::run_pipeline(&config.source_paths())
        .context("ingestion pipeline failed")?;
    info!(
        companies = output.composite.company_info.height(),
        employees = output.composite.employee_data.height(),
        performance_rows = output.composite.company_performance.height(),
        activity_available = output.composite.membership_activity.is_some(),
        "composite dataset ready"
    );

    let state = Arc::new(AppState {
        composite: output.composite,
        raw: output.raw,
    });
    let router = routes::app_router(state);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
