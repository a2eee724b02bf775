use super::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn new_issue(title: &str) -> NewIssue {
    NewIssue {
        team_id: "team-1".to_string(),
        title: CanonicalTitle::new(title),
        description: Some("api/lib.rs line 7".to_string()),
        parent_id: Some("parent-1".to_string()),
        assignee_id: Some("viewer-1".to_string()),
    }
}

#[test]
fn test_issue_create_input_carries_all_fields() {
    let input = issue_create_input(&new_issue("api - fix bug"));
    assert_eq!(input["teamId"], "team-1");
    assert_eq!(input["title"], "api - fix bug");
    assert_eq!(input["description"], "api/lib.rs line 7");
    assert_eq!(input["parentId"], "parent-1");
    assert_eq!(input["assigneeId"], "viewer-1");
}

#[test]
fn test_issue_create_input_omits_unset_fields() {
    let issue = NewIssue {
        description: None,
        parent_id: None,
        assignee_id: None,
        ..new_issue("api - fix bug")
    };
    let input = issue_create_input(&issue);
    let map = input.as_object().unwrap();
    assert!(!map.contains_key("description"));
    assert!(!map.contains_key("parentId"));
    assert!(!map.contains_key("assigneeId"));
}

#[test]
fn test_decode_envelope_happy_path() {
    let data: ViewerData =
        decode_envelope(r#"{"data":{"viewer":{"id":"viewer-9"}}}"#).unwrap();
    assert_eq!(data.viewer.id, "viewer-9");
}

#[test]
fn test_decode_envelope_graphql_errors_map_to_api() {
    let body = r#"{"data":null,"errors":[{"message":"rate limited"},{"message":"try later"}]}"#;
    let result = decode_envelope::<ViewerData>(body);
    let Err(TrackerError::Api(message)) = result else {
        panic!("expected an API error");
    };
    assert_eq!(message, "rate limited; try later");
}

#[test]
fn test_decode_envelope_missing_data_is_malformed() {
    let result = decode_envelope::<ViewerData>("{}");
    assert!(matches!(result, Err(TrackerError::MalformedResponse(_))));
}

#[test]
fn test_decode_envelope_non_json_body_is_malformed() {
    let result = decode_envelope::<ViewerData>("<html>bad gateway</html>");
    assert!(matches!(result, Err(TrackerError::MalformedResponse(_))));
}

/// Serve exactly one request with a canned JSON body, returning the endpoint.
async fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}/graphql")
}

/// Consume one full HTTP request (headers plus content-length body bytes).
async fn read_request(socket: &mut TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "client closed before finishing the request");
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map_or(0, |value| value.trim().parse().unwrap());
    while data.len() < header_end + content_length {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "client closed mid-body");
        data.extend_from_slice(&buf[..n]);
    }
}

#[tokio::test]
async fn test_viewer_id_round_trip() {
    let endpoint = serve_once(r#"{"data":{"viewer":{"id":"viewer-9"}}}"#).await;
    let client = LinearClient::new("lin_api_test").with_endpoint(endpoint);
    assert_eq!(client.viewer_id().await.unwrap(), "viewer-9");
}

#[tokio::test]
async fn test_unsuccessful_create_maps_to_api_error() {
    let endpoint =
        serve_once(r#"{"data":{"issueCreate":{"success":false,"issue":null}}}"#).await;
    let client = LinearClient::new("lin_api_test").with_endpoint(endpoint);
    let result = client.create_issue(new_issue("api - fix bug")).await;
    assert!(matches!(result, Err(TrackerError::Api(_))));
}

#[tokio::test]
async fn test_unsuccessful_batch_transition_maps_to_api_error() {
    let endpoint =
        serve_once(r#"{"data":{"issueBatchUpdate":{"success":false}}}"#).await;
    let client = LinearClient::new("lin_api_test").with_endpoint(endpoint);
    let result = client
        .transition_issue_batch(&["issue-1".to_string()], "state-done")
        .await;
    assert!(matches!(result, Err(TrackerError::Api(_))));
}

#[tokio::test]
async fn test_batch_create_round_trip() {
    let endpoint = serve_once(
        r#"{"data":{"issueBatchCreate":{"success":true,
            "issues":[{"id":"issue-1","title":"api - fix bug"}]}}}"#,
    )
    .await;
    let client = LinearClient::new("lin_api_test").with_endpoint(endpoint);
    let created = client
        .create_issue_batch(vec![new_issue("api - fix bug")])
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, "issue-1");
    assert_eq!(created[0].title.as_str(), "api - fix bug");
}
