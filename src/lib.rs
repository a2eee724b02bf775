#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod config;
pub mod logging;
pub mod scanner;
pub mod state;
pub mod sync;
pub mod title;
pub mod tracker;

// Re-export commonly used types
pub use config::{bootstrap_config, load_config, ConfigError, SyncConfig};
pub use scanner::{
    discover_repo_root, MarkerOccurrence, MarkerScanner, RipgrepScanner, ScanError,
};
pub use state::{load_state, save_state, StateError, SyncState, TrackedIssue, STATE_FILENAME};
pub use sync::{
    build_sync_plan, ensure_parent, execute_sync_plan, run_sync, scan_todos, SyncError, SyncPlan,
    SyncReport,
};
pub use title::{canonical_title, canonicalize_scan, CanonicalTitle, TodoItem};
pub use tracker::{
    CreatedIssue, LinearClient, NewIssue, Team, TrackerClient, TrackerError, WorkflowState,
};
