use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bizmeld_core::SourcePaths;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub datasets: DatasetPaths,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatasetPaths {
    pub records: PathBuf,
    pub activity: PathBuf,
    pub report: PathBuf,
    pub deck: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    8000
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn source_paths(&self) -> SourcePaths {
        SourcePaths {
            records: self.datasets.records.clone(),
            activity: self.datasets.activity.clone(),
            report: self.datasets.report.clone(),
            deck: self.datasets.deck.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_with_defaulted_server_section() {
        let config: Config = toml::from_str(
            r#"
[datasets]
records = "datasets/records.json"
activity = "datasets/activity.csv"
report = "datasets/report.pdf"
deck = "datasets/deck.pptx"
"#,
        )
        .expect("config parse failed");

        assert_eq!(config.server.port, 8000);
        assert_eq!(
            config.source_paths().records,
            PathBuf::from("datasets/records.json")
        );
    }

    #[test]
    fn explicit_port_overrides_default() {
        let config: Config = toml::from_str(
            r#"
[datasets]
records = "r.json"
activity = "a.csv"
report = "p.pdf"
deck = "d.pptx"

[server]
port = 9100
"#,
        )
        .expect("config parse failed");
        assert_eq!(config.server.port, 9100);
    }
}
