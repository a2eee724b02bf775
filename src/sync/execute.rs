//! Tracker-side execution of a sync plan.

use super::plan::SyncPlan;
use super::SyncError;
use crate::config::SyncConfig;
use crate::state::{SyncState, TrackedIssue};
use crate::title::CanonicalTitle;
use crate::tracker::{NewIssue, TrackerClient};
use tracing::info;

/// Resolve the umbrella issue id for this run.
///
/// When a previous snapshot exists its `parentid` is reused as-is (it is
/// immutable once assigned). Otherwise one umbrella issue titled with the
/// repository directory name is created; this happens at most once, triggered
/// solely by the snapshot being absent.
pub async fn ensure_parent(
    tracker: &dyn TrackerClient,
    config: &SyncConfig,
    repo_name: &str,
    assignee_id: &str,
    previous: Option<&SyncState>,
) -> Result<String, SyncError> {
    if let Some(state) = previous {
        return Ok(state.parentid.clone());
    }

    let parent_id = tracker
        .create_issue(NewIssue {
            team_id: config.team_id.clone(),
            title: CanonicalTitle::new(repo_name),
            description: None,
            parent_id: None,
            assignee_id: Some(assignee_id.to_string()),
        })
        .await?;
    info!(parent_id = %parent_id, "Created umbrella issue for repository");
    Ok(parent_id)
}

/// Execute the plan's tracker operations and assemble the next snapshot.
///
/// One batch transition for every stale issue, then one batch creation for
/// every fresh title; empty batches issue no call. Either batch failing
/// surfaces as fatal before any state is rewritten, so a rerun redoes the
/// same diff. Returns the next snapshot's issues: created-fresh first, then
/// matched, preserving scan and snapshot order respectively.
pub async fn execute_sync_plan(
    tracker: &dyn TrackerClient,
    config: &SyncConfig,
    parent_id: &str,
    assignee_id: &str,
    plan: SyncPlan,
) -> Result<Vec<TrackedIssue>, SyncError> {
    let SyncPlan {
        fresh,
        matched,
        stale,
    } = plan;

    if !stale.is_empty() {
        let ids: Vec<String> = stale.iter().map(|issue| issue.id.clone()).collect();
        tracker
            .transition_issue_batch(&ids, &config.resolved_state_id)
            .await?;
        info!(count = ids.len(), "Transitioned stale issues to resolved status");
    }

    let mut next = Vec::new();
    if !fresh.is_empty() {
        let requests: Vec<NewIssue> = fresh
            .iter()
            .map(|item| NewIssue {
                team_id: config.team_id.clone(),
                title: item.title.clone(),
                description: Some(format!("{} line {}", item.path, item.line)),
                parent_id: Some(parent_id.to_string()),
                assignee_id: Some(assignee_id.to_string()),
            })
            .collect();
        let created = tracker.create_issue_batch(requests).await?;
        info!(count = created.len(), "Created issues for fresh markers");
        next.extend(created.into_iter().map(|issue| TrackedIssue {
            id: issue.id,
            title: issue.title,
        }));
    }

    next.extend(matched);
    Ok(next)
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;
