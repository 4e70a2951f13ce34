//! App Config Module
//! Remembers last-used source files and the last selected view between runs.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const CONFIG_FILE: &str = "resto_lens.json";

/// Persisted user settings. Everything is optional; a missing or malformed
/// config file degrades to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub restaurants_csv: Option<PathBuf>,
    pub country_workbook: Option<PathBuf>,
    pub last_view: Option<String>,
}

impl AppConfig {
    /// Load config from the working directory, falling back to defaults.
    pub fn load_or_default() -> Self {
        match fs::read_to_string(CONFIG_FILE) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("ignoring malformed {CONFIG_FILE}: {e}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Write config back to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(CONFIG_FILE, contents)
            .with_context(|| format!("failed to write {CONFIG_FILE}"))?;
        Ok(())
    }
}
