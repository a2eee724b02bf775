//! Persisted sync snapshot.
//!
//! One JSON document per repository, at the repository root, recording the
//! umbrella issue and every currently tracked marker issue. The file is
//! expected to be kept out of version control by operator convention (global
//! gitignore); the store itself does not enforce that.

use crate::title::CanonicalTitle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Snapshot filename at the repository root.
pub const STATE_FILENAME: &str = ".todo.state.json";

#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed sync state document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One tracker issue currently standing in for a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackedIssue {
    /// Opaque tracker-assigned id.
    pub id: String,
    pub title: CanonicalTitle,
}

/// The last successfully synchronized state for one repository.
///
/// `parentid` is immutable once assigned. Canonical titles are unique within
/// `issues`; the reconciler guarantees that by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncState {
    pub parentid: String,
    pub issues: Vec<TrackedIssue>,
}

#[must_use]
pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILENAME)
}

/// Load the previous snapshot.
///
/// An absent document is a normal first run and returns `Ok(None)`; a present
/// but malformed document is fatal and never treated as absent.
pub async fn load_state(root: &Path) -> Result<Option<SyncState>, StateError> {
    // Absence is detected from the read itself, not a prior exists() check,
    // so a document removed concurrently still reads as absent.
    let content = match fs::read_to_string(state_path(root)).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let state: SyncState = serde_json::from_str(&content)?;
    Ok(Some(state))
}

/// Persist the snapshot atomically.
///
/// Writes to a per-call unique temp file next to the target, then renames, so
/// a crash never leaves a half-written document behind.
pub async fn save_state(root: &Path, state: &SyncState) -> Result<(), StateError> {
    let path = state_path(root);

    let unique_id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let temp_path = root.join(format!(".todo.state.{unique_id}.json.tmp"));

    let content = serde_json::to_string_pretty(state)?;
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, &path).await?;
    Ok(())
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
