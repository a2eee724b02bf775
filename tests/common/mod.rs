//! Common test doubles for pipeline tests.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use todosync::{
    CreatedIssue, MarkerOccurrence, MarkerScanner, NewIssue, ScanError, Team, TrackerClient,
    TrackerError, WorkflowState,
};

/// Scanner yielding a fabricated occurrence list; no external process.
pub struct StaticScanner {
    pub occurrences: Vec<MarkerOccurrence>,
}

impl StaticScanner {
    pub fn new(occurrences: Vec<(&str, u32, &str)>) -> Self {
        Self {
            occurrences: occurrences
                .into_iter()
                .map(|(path, line, text)| MarkerOccurrence {
                    path: path.to_string(),
                    line,
                    text: text.to_string(),
                })
                .collect(),
        }
    }
}

impl MarkerScanner for StaticScanner {
    fn scan(&self, _root: &Path) -> Result<Vec<MarkerOccurrence>, ScanError> {
        Ok(self.occurrences.clone())
    }
}

/// What the fake tracker was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    Viewer,
    Create(NewIssue),
    CreateBatch(Vec<NewIssue>),
    Transition { ids: Vec<String>, state: String },
}

/// In-memory tracker handing out sequential ids and recording every call.
#[derive(Default)]
pub struct FakeTracker {
    pub calls: Mutex<Vec<TrackerCall>>,
    pub counter: Mutex<u32>,
    pub fail_create_batch: bool,
    /// Confirm this many fewer issues than the create batch asked for.
    pub create_batch_shortfall: usize,
}

impl FakeTracker {
    fn next_id(&self) -> String {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        format!("issue-{counter}")
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that mutate tracker state (creates and transitions).
    pub fn write_calls(&self) -> Vec<TrackerCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, TrackerCall::Viewer))
            .collect()
    }
}

#[async_trait]
impl TrackerClient for FakeTracker {
    async fn viewer_id(&self) -> Result<String, TrackerError> {
        self.calls.lock().unwrap().push(TrackerCall::Viewer);
        Ok("viewer-1".to_string())
    }

    async fn list_teams(&self) -> Result<Vec<Team>, TrackerError> {
        Ok(vec![Team {
            id: "team-1".to_string(),
            name: "Engineering".to_string(),
        }])
    }

    async fn list_workflow_states(
        &self,
        _team_id: &str,
    ) -> Result<Vec<WorkflowState>, TrackerError> {
        Ok(vec![WorkflowState {
            id: "state-done".to_string(),
            name: "Done".to_string(),
        }])
    }

    async fn create_issue(&self, issue: NewIssue) -> Result<String, TrackerError> {
        self.calls.lock().unwrap().push(TrackerCall::Create(issue));
        Ok(self.next_id())
    }

    async fn create_issue_batch(
        &self,
        issues: Vec<NewIssue>,
    ) -> Result<Vec<CreatedIssue>, TrackerError> {
        self.calls
            .lock()
            .unwrap()
            .push(TrackerCall::CreateBatch(issues.clone()));
        if self.fail_create_batch {
            return Err(TrackerError::Api("batch create rejected".to_string()));
        }
        let confirmed = issues.len().saturating_sub(self.create_batch_shortfall);
        Ok(issues
            .into_iter()
            .take(confirmed)
            .map(|issue| CreatedIssue {
                id: self.next_id(),
                title: issue.title,
            })
            .collect())
    }

    async fn transition_issue_batch(
        &self,
        ids: &[String],
        state_id: &str,
    ) -> Result<(), TrackerError> {
        self.calls.lock().unwrap().push(TrackerCall::Transition {
            ids: ids.to_vec(),
            state: state_id.to_string(),
        });
        Ok(())
    }
}

pub fn test_config() -> todosync::SyncConfig {
    todosync::SyncConfig {
        api_key: "lin_api_test".to_string(),
        team_id: "team-1".to_string(),
        resolved_state_id: "state-done".to_string(),
    }
}
