use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::task::FilterMode;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Task file location. Falls back to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a deleted row stays visible (fading) before it is removed.
    #[serde(default = "default_delete_delay_ms")]
    pub delete_delay_ms: u64,
    /// chrono strftime pattern for the due-date label
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub default_filter: FilterMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            delete_delay_ms: default_delete_delay_ms(),
            date_format: default_date_format(),
            default_filter: FilterMode::All,
        }
    }
}

fn default_delete_delay_ms() -> u64 {
    300
}

fn default_date_format() -> String {
    "%d %b %Y".to_string()
}
