use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::bookmaker::BookmakerRegistry;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub bookmakers: Vec<String>,
    pub snapshots: SnapshotConfig,
    pub arbitrage: ArbitrageConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotConfig {
    pub base_path: String,
    #[serde(default)]
    pub files: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ArbitrageConfig {
    pub excluded_markets: Vec<String>,
    #[serde(default)]
    pub check_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

impl SnapshotConfig {
    /// Location of a bookmaker's snapshot, falling back to `pregame_<id>.json`.
    pub fn path_for(&self, bookmaker: &str) -> PathBuf {
        let file = self
            .files
            .get(bookmaker)
            .cloned()
            .unwrap_or_else(|| format!("pregame_{}.json", bookmaker));
        PathBuf::from(&self.base_path).join(file)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut settings = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("SUREBET").separator("__"));

        // Override snapshot directory from environment if present
        if let Ok(dir) = std::env::var("SNAPSHOT_DIR") {
            settings = settings.set_override("snapshots.base_path", dir)?;
        }

        let config: Config = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bookmakers.len() < 2 {
            return Err(anyhow!(
                "At least two bookmakers are required, got {}",
                self.bookmakers.len()
            ));
        }

        for (i, id) in self.bookmakers.iter().enumerate() {
            if !BookmakerRegistry::is_known(id) {
                return Err(anyhow!("Unknown bookmaker in configuration: {}", id));
            }
            if self.bookmakers[..i].contains(id) {
                return Err(anyhow!("Bookmaker listed twice in configuration: {}", id));
            }
        }

        match self.output.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(anyhow!("Unsupported output format: {}", other)),
        }
    }
}
