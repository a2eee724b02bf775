//! TODO-marker discovery.
//!
//! The scanner walks a git repository for `// TODO` comments and yields one
//! [`MarkerOccurrence`] per matched line. It is a capability trait so the
//! reconciliation pipeline can be driven from a fabricated occurrence list in
//! tests, with no external process involved.

mod ripgrep;

pub use ripgrep::RipgrepScanner;

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Not a git repository")]
    NotGitRepository,

    #[error("Search tool not found: {0}")]
    SearchToolMissing(String),

    #[error("Failed to execute search command: {0}")]
    CommandError(String),

    #[error("Search output was not valid UTF-8")]
    InvalidUtf8,

    #[error("Unparseable search output line: {0}")]
    MalformedLine(String),
}

/// One raw marker hit: repository-relative path, 1-based line number, and the
/// comment text with marker syntax already stripped. Discarded after
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOccurrence {
    pub path: String,
    pub line: u32,
    pub text: String,
}

/// Capability for locating TODO markers under a repository root.
pub trait MarkerScanner: Send + Sync {
    /// Produce every marker occurrence under `root`, in search order.
    ///
    /// Occurrences whose comment text is empty after stripping marker syntax
    /// are discarded.
    fn scan(&self, root: &Path) -> Result<Vec<MarkerOccurrence>, ScanError>;
}

/// Resolve the repository toplevel containing `start`.
///
/// Runs `git rev-parse --show-toplevel`, the same probe the sync state and
/// scan are anchored to.
pub fn discover_repo_root(start: &Path) -> Result<PathBuf, ScanError> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(start)
        // Clear GIT_DIR to avoid being affected by git hooks environment
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .output()
        .map_err(|e| ScanError::CommandError(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not a git repository") {
            return Err(ScanError::NotGitRepository);
        }
        return Err(ScanError::CommandError(stderr.to_string()));
    }

    let root = String::from_utf8(output.stdout)
        .map_err(|_| ScanError::InvalidUtf8)?
        .trim()
        .to_string();

    if root.is_empty() {
        return Err(ScanError::NotGitRepository);
    }

    Ok(PathBuf::from(root))
}
