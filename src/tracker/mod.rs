//! Issue tracker capability surface.
//!
//! The reconciler only ever talks to the tracker through [`TrackerClient`];
//! retry and backoff policy belong to the implementation behind the trait,
//! never to the reconciler.

mod linear;

pub use linear::LinearClient;

use crate::title::CanonicalTitle;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Tracker API error: {0}")]
    Api(String),

    #[error("Malformed tracker response: {0}")]
    MalformedResponse(String),
}

/// Creation request for one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub team_id: String,
    pub title: CanonicalTitle,
    pub description: Option<String>,
    /// Umbrella issue to nest under; `None` for the umbrella itself.
    pub parent_id: Option<String>,
    pub assignee_id: Option<String>,
}

/// Tracker-assigned identity for a created issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub id: String,
    pub title: CanonicalTitle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    pub id: String,
    pub name: String,
}

/// Operations the pipeline needs from a tracker.
#[async_trait]
pub trait TrackerClient: Send + Sync {
    /// Identity lookup for the authenticated user; created issues are
    /// assigned to this user.
    async fn viewer_id(&self) -> Result<String, TrackerError>;

    async fn list_teams(&self) -> Result<Vec<Team>, TrackerError>;

    async fn list_workflow_states(&self, team_id: &str)
        -> Result<Vec<WorkflowState>, TrackerError>;

    /// Create a single issue, returning its tracker-assigned id.
    async fn create_issue(&self, issue: NewIssue) -> Result<String, TrackerError>;

    /// Create a batch of issues in one call.
    async fn create_issue_batch(
        &self,
        issues: Vec<NewIssue>,
    ) -> Result<Vec<CreatedIssue>, TrackerError>;

    /// Transition a batch of issues to the given workflow state in one call.
    async fn transition_issue_batch(
        &self,
        ids: &[String],
        state_id: &str,
    ) -> Result<(), TrackerError>;
}
