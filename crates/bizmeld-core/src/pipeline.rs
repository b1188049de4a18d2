use std::path::PathBuf;

use bizmeld_parser::{
    read_activity, read_deck, read_records, read_report, DeckSummary, PageExtract, Table,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::merge::{merge_sources, CompositeDataset};
use crate::normalize::{normalize_activity, normalize_deck, normalize_records, normalize_report};

/// Locations of the four raw sources, resolved by the caller.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub records: PathBuf,
    pub activity: PathBuf,
    pub report: PathBuf,
    pub deck: PathBuf,
}

/// Per-source intermediate results, kept around for the debug endpoints.
#[derive(Debug, Clone)]
pub struct RawSources {
    pub records: Value,
    /// `None` when the activity source could not be read.
    pub activity: Option<Table>,
    pub report: Vec<PageExtract>,
    pub deck: DeckSummary,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw: RawSources,
    pub composite: CompositeDataset,
}

/// Runs the full ingest, normalize, and merge pipeline once, sequentially.
///
/// A failure reading the activity source is downgraded to "unavailable";
/// every other failure aborts the run and surfaces to the caller.
pub fn run_pipeline(paths: &SourcePaths) -> Result<PipelineOutput> {
    let records = read_records(&paths.records)?;
    let activity = match read_activity(&paths.activity) {
        Ok(table) => Some(table),
        Err(err) => {
            warn!("membership activity source unavailable: {err}");
            None
        }
    };
    let report = read_report(&paths.report)?;
    let deck = read_deck(&paths.deck)?;
    info!(
        report_pages = report.len(),
        activity_rows = activity.as_ref().map(Table::height).unwrap_or(0),
        "sources ingested"
    );

    let record_frames = normalize_records(&records)?;
    let membership_activity = activity.as_ref().map(normalize_activity).transpose()?;
    let aggregated_performance = normalize_report(&report)?;
    let presentation = normalize_deck(&deck);

    let composite = merge_sources(
        record_frames,
        membership_activity,
        aggregated_performance,
        presentation,
    );

    Ok(PipelineOutput {
        raw: RawSources {
            records,
            activity,
            report,
            deck,
        },
        composite,
    })
}
