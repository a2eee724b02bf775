//! Pure diff between the current scan and the persisted snapshot.

use crate::state::TrackedIssue;
use crate::title::{CanonicalTitle, TodoItem};
use std::collections::HashSet;

/// The minimal set of tracker operations for one run.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Titles with no previously tracked issue; one create each.
    pub fresh: Vec<TodoItem>,
    /// Previously tracked issues whose marker still exists; carried into the
    /// next snapshot unchanged, no tracker call.
    pub matched: Vec<TrackedIssue>,
    /// Previously tracked issues whose marker disappeared; transitioned to
    /// the resolved status and dropped from the next snapshot.
    pub stale: Vec<TrackedIssue>,
}

impl SyncPlan {
    /// True when the run needs no tracker operation at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.fresh.is_empty() && self.stale.is_empty()
    }
}

/// Partition the current titles and the previous snapshot.
///
/// Matching is exact string equality on the canonical title; the uniqueness
/// invariant on snapshot titles makes each match unambiguous. Re-running with
/// an unchanged title set yields empty `fresh` and `stale` sets, which is
/// what makes at-least-once execution of a run safe.
#[must_use]
pub fn build_sync_plan(current: &[TodoItem], previous: &[TrackedIssue]) -> SyncPlan {
    let current_titles: HashSet<&CanonicalTitle> = current.iter().map(|t| &t.title).collect();
    let previous_titles: HashSet<&CanonicalTitle> = previous.iter().map(|i| &i.title).collect();

    let mut plan = SyncPlan::default();
    for issue in previous {
        if current_titles.contains(&issue.title) {
            plan.matched.push(issue.clone());
        } else {
            plan.stale.push(issue.clone());
        }
    }
    for item in current {
        if !previous_titles.contains(&item.title) {
            plan.fresh.push(item.clone());
        }
    }
    plan
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
