use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Environment variable that overrides the task file location
pub const TASK_FILE_ENV: &str = "CHECKLIST_FILE";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `<config dir>/checklist/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("checklist").join("config.toml"))
}

/// Load the config. An explicit path must exist; the default location is
/// optional and falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(Config::default()),
        },
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve the task file: flag, then environment, then config, then the
/// platform data dir.
pub fn resolve_task_file(flag: Option<&Path>, config: &Config) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(TASK_FILE_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = &config.storage.path {
        return Some(path.clone());
    }
    crate::io::persistence::FileStore::default_path()
}
