//! User-level configuration loaded from `~/.todosync/config.toml`.
//!
//! The pipeline never reads this itself; `main` loads the value once and
//! passes it down. If `TODOSYNC_HOME` is set, that directory is used instead
//! of `~/.todosync`, which lets tests and CI use an isolated config without
//! touching the user's real data.

mod bootstrap;

pub use bootstrap::bootstrap_config;

use crate::tracker::TrackerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    HomeDirNotFound,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to serialize config TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Config field must not be empty: {0}")]
    EmptyField(&'static str),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Tracker call failed during setup: {0}")]
    Tracker(#[from] TrackerError),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Credentials and tracker identifiers for one operator, loaded once per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Linear API key.
    pub api_key: String,
    /// Team every created issue belongs to.
    pub team_id: String,
    /// Workflow state stale issues are transitioned to.
    pub resolved_state_id: String,
}

impl SyncConfig {
    /// Reject configs with missing values; a present-but-incomplete file is
    /// an error, never silently re-bootstrapped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyField("api_key"));
        }
        if self.team_id.trim().is_empty() {
            return Err(ConfigError::EmptyField("team_id"));
        }
        if self.resolved_state_id.trim().is_empty() {
            return Err(ConfigError::EmptyField("resolved_state_id"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Directory holding user-scoped todosync data (`~/.todosync`, or
/// `TODOSYNC_HOME` when set).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(home) = std::env::var("TODOSYNC_HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|h| h.join(".todosync"))
        .ok_or(ConfigError::HomeDirNotFound)
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the configuration, or `Ok(None)` when the file does not exist yet
/// (first run, bootstrap needed).
pub fn load_config() -> Result<Option<SyncConfig>, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let config: SyncConfig = toml::from_str(&content)?;
    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

/// Write the configuration, creating the directory if needed. Returns the
/// path written to.
pub fn save_config(config: &SyncConfig) -> Result<PathBuf, ConfigError> {
    config.validate()?;
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
