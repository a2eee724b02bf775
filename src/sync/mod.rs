//! The reconciliation pipeline.
//!
//! Strictly sequential: scan, normalize, diff against the persisted snapshot,
//! execute tracker batches, and only then rewrite the snapshot. Every failure
//! aborts before the snapshot is touched, so the next run always starts from
//! the last known-good state.

mod execute;
mod plan;

pub use execute::{ensure_parent, execute_sync_plan};
pub use plan::{build_sync_plan, SyncPlan};

use crate::config::SyncConfig;
use crate::scanner::{MarkerScanner, ScanError};
use crate::state::{load_state, save_state, StateError, SyncState};
use crate::title::{canonicalize_scan, TodoItem};
use crate::tracker::{TrackerClient, TrackerError};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("State store failed: {0}")]
    State(#[from] StateError),

    #[error("Tracker call failed: {0}")]
    Tracker(#[from] TrackerError),
}

/// Counts for user-facing output after a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub resolved: usize,
    pub matched: usize,
    /// Whether this run created the umbrella issue (first run).
    pub parent_created: bool,
}

/// Scan and normalize only; no tracker or state access.
///
/// Backs the dry-run CLI mode and is independently callable.
pub fn scan_todos(
    root: &Path,
    scanner: &dyn MarkerScanner,
) -> Result<Vec<TodoItem>, ScanError> {
    let occurrences = scanner.scan(root)?;
    Ok(canonicalize_scan(&occurrences))
}

/// Run one full synchronization of the repository at `root`.
pub async fn run_sync(
    root: &Path,
    scanner: &dyn MarkerScanner,
    tracker: &dyn TrackerClient,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    let todos = scan_todos(root, scanner)?;
    debug!(count = todos.len(), "Canonicalized current markers");

    let previous = load_state(root).await?;
    let assignee_id = tracker.viewer_id().await?;

    let repo_name = root.file_name().map_or_else(
        || root.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    let parent_created = previous.is_none();
    let parentid =
        ensure_parent(tracker, config, &repo_name, &assignee_id, previous.as_ref()).await?;

    let previous_issues = previous.as_ref().map_or(&[][..], |s| s.issues.as_slice());
    let plan = build_sync_plan(&todos, previous_issues);
    let resolved = plan.stale.len();
    let matched = plan.matched.len();
    if plan.is_noop() {
        debug!("No tracker operations needed this run");
    }

    let issues = execute_sync_plan(tracker, config, &parentid, &assignee_id, plan).await?;

    // The next snapshot is created issues followed by matched ones, so the
    // created count is derived from what the tracker confirmed rather than
    // from the size of the requested batch.
    let report = SyncReport {
        created: issues.len().saturating_sub(matched),
        resolved,
        matched,
        parent_created,
    };

    // Persisted only after every tracker batch succeeded; the local ledger
    // never reflects operations the tracker has not confirmed.
    save_state(root, &SyncState { parentid, issues }).await?;
    info!(
        created = report.created,
        resolved = report.resolved,
        matched = report.matched,
        "Sync complete"
    );
    Ok(report)
}
