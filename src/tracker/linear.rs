//! Linear GraphQL client.

use super::{CreatedIssue, NewIssue, Team, TrackerClient, TrackerError, WorkflowState};
use crate::title::CanonicalTitle;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const LINEAR_API_URL: &str = "https://api.linear.app/graphql";

/// Tracker client speaking Linear's GraphQL API.
pub struct LinearClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl LinearClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: LINEAR_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (local mock servers).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Execute one GraphQL request and deserialize the `data` payload.
    async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, TrackerError> {
        debug!(endpoint = %self.endpoint, "Sending tracker request");
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        decode_envelope(&body)
    }
}

/// Unpack a GraphQL response body: errors beat data, absent data is malformed.
fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, TrackerError> {
    let envelope: GraphQlResponse<T> =
        serde_json::from_str(body).map_err(|e| TrackerError::MalformedResponse(e.to_string()))?;
    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(TrackerError::Api(messages.join("; ")));
    }
    envelope
        .data
        .ok_or_else(|| TrackerError::MalformedResponse("missing data payload".to_string()))
}

fn issue_create_input(issue: &NewIssue) -> Value {
    let mut input = json!({
        "teamId": issue.team_id,
        "title": issue.title.as_str(),
    });
    if let Some(map) = input.as_object_mut() {
        if let Some(description) = &issue.description {
            map.insert("description".to_string(), json!(description));
        }
        if let Some(parent_id) = &issue.parent_id {
            map.insert("parentId".to_string(), json!(parent_id));
        }
        if let Some(assignee_id) = &issue.assignee_id {
            map.insert("assigneeId".to_string(), json!(assignee_id));
        }
    }
    input
}

#[async_trait]
impl TrackerClient for LinearClient {
    async fn viewer_id(&self) -> Result<String, TrackerError> {
        let data: ViewerData = self
            .request("query { viewer { id } }", json!({}))
            .await?;
        Ok(data.viewer.id)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, TrackerError> {
        let data: TeamsData = self
            .request("query { teams { nodes { id name } } }", json!({}))
            .await?;
        Ok(data
            .teams
            .nodes
            .into_iter()
            .map(|n| Team {
                id: n.id,
                name: n.name,
            })
            .collect())
    }

    async fn list_workflow_states(
        &self,
        team_id: &str,
    ) -> Result<Vec<WorkflowState>, TrackerError> {
        let query = "query WorkflowStates($teamId: ID!) { \
                     workflowStates(filter: { team: { id: { eq: $teamId } } }) { \
                     nodes { id name } } }";
        let data: WorkflowStatesData = self
            .request(query, json!({ "teamId": team_id }))
            .await?;
        Ok(data
            .workflow_states
            .nodes
            .into_iter()
            .map(|n| WorkflowState {
                id: n.id,
                name: n.name,
            })
            .collect())
    }

    async fn create_issue(&self, issue: NewIssue) -> Result<String, TrackerError> {
        let query = "mutation IssueCreate($input: IssueCreateInput!) { \
                     issueCreate(input: $input) { success issue { id title } } }";
        let data: IssueCreateData = self
            .request(query, json!({ "input": issue_create_input(&issue) }))
            .await?;
        if !data.issue_create.success {
            return Err(TrackerError::Api("issue creation was not successful".to_string()));
        }
        let created = data
            .issue_create
            .issue
            .ok_or_else(|| TrackerError::MalformedResponse("missing created issue".to_string()))?;
        Ok(created.id)
    }

    async fn create_issue_batch(
        &self,
        issues: Vec<NewIssue>,
    ) -> Result<Vec<CreatedIssue>, TrackerError> {
        let inputs: Vec<Value> = issues.iter().map(issue_create_input).collect();
        let query = "mutation IssueBatchCreate($input: IssueBatchCreateInput!) { \
                     issueBatchCreate(input: $input) { success issues { id title } } }";
        let data: IssueBatchCreateData = self
            .request(query, json!({ "input": { "issues": inputs } }))
            .await?;
        if !data.issue_batch_create.success {
            return Err(TrackerError::Api(
                "issue batch creation was not successful".to_string(),
            ));
        }
        Ok(data
            .issue_batch_create
            .issues
            .into_iter()
            .map(|n| CreatedIssue {
                id: n.id,
                title: CanonicalTitle::new(n.title),
            })
            .collect())
    }

    async fn transition_issue_batch(
        &self,
        ids: &[String],
        state_id: &str,
    ) -> Result<(), TrackerError> {
        let query = "mutation IssueBatchUpdate($ids: [UUID!]!, $input: IssueUpdateInput!) { \
                     issueBatchUpdate(ids: $ids, input: $input) { success } }";
        let data: IssueBatchUpdateData = self
            .request(
                query,
                json!({ "ids": ids, "input": { "stateId": state_id } }),
            )
            .await?;
        if !data.issue_batch_update.success {
            return Err(TrackerError::Api(
                "issue batch transition was not successful".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ViewerData {
    viewer: ViewerNode,
}

#[derive(Deserialize)]
struct ViewerNode {
    id: String,
}

#[derive(Deserialize)]
struct TeamsData {
    teams: NodeList,
}

#[derive(Deserialize)]
struct WorkflowStatesData {
    #[serde(rename = "workflowStates")]
    workflow_states: NodeList,
}

#[derive(Deserialize)]
struct NodeList {
    nodes: Vec<NamedNode>,
}

#[derive(Deserialize)]
struct NamedNode {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct IssueCreateData {
    #[serde(rename = "issueCreate")]
    issue_create: IssuePayload,
}

#[derive(Deserialize)]
struct IssuePayload {
    success: bool,
    issue: Option<IssueNode>,
}

#[derive(Deserialize)]
struct IssueBatchCreateData {
    #[serde(rename = "issueBatchCreate")]
    issue_batch_create: IssueBatchPayload,
}

#[derive(Deserialize)]
struct IssueBatchPayload {
    success: bool,
    issues: Vec<IssueNode>,
}

#[derive(Deserialize)]
struct IssueNode {
    id: String,
    title: String,
}

#[derive(Deserialize)]
struct IssueBatchUpdateData {
    #[serde(rename = "issueBatchUpdate")]
    issue_batch_update: SuccessPayload,
}

#[derive(Deserialize)]
struct SuccessPayload {
    success: bool,
}

#[cfg(test)]
#[path = "linear_tests.rs"]
mod tests;
