use super::*;
use tempfile::tempdir;

fn sample_state() -> SyncState {
    SyncState {
        parentid: "parent-1".to_string(),
        issues: vec![
            TrackedIssue {
                id: "1".to_string(),
                title: CanonicalTitle::new("api - fix bug"),
            },
            TrackedIssue {
                id: "2".to_string(),
                title: CanonicalTitle::new("web - add test"),
            },
        ],
    }
}

#[tokio::test]
async fn test_load_absent_is_none() {
    let dir = tempdir().unwrap();
    let loaded = load_state(dir.path()).await.unwrap();
    assert_eq!(loaded, None);
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let state = sample_state();
    save_state(dir.path(), &state).await.unwrap();
    let loaded = load_state(dir.path()).await.unwrap();
    assert_eq!(loaded, Some(state));
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let dir = tempdir().unwrap();
    save_state(dir.path(), &sample_state()).await.unwrap();

    let next = SyncState {
        parentid: "parent-1".to_string(),
        issues: vec![],
    };
    save_state(dir.path(), &next).await.unwrap();

    let loaded = load_state(dir.path()).await.unwrap();
    assert_eq!(loaded, Some(next));
}

#[tokio::test]
async fn test_unreadable_document_is_io_error_not_absent() {
    // Only a missing document maps to None; any other read failure (here a
    // directory squatting on the state path) must surface as Io.
    let dir = tempdir().unwrap();
    tokio::fs::create_dir(state_path(dir.path())).await.unwrap();
    let result = load_state(dir.path()).await;
    assert!(matches!(result, Err(StateError::Io(_))));
}

#[tokio::test]
async fn test_malformed_document_is_an_error_not_absent() {
    let dir = tempdir().unwrap();
    tokio::fs::write(state_path(dir.path()), "{ not json")
        .await
        .unwrap();
    let result = load_state(dir.path()).await;
    assert!(matches!(result, Err(StateError::Json(_))));
}

#[tokio::test]
async fn test_document_shape_matches_wire_format() {
    let dir = tempdir().unwrap();
    save_state(dir.path(), &sample_state()).await.unwrap();

    let raw = tokio::fs::read_to_string(state_path(dir.path()))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["parentid"], "parent-1");
    assert_eq!(value["issues"][0]["id"], "1");
    assert_eq!(value["issues"][0]["title"], "api - fix bug");
}

#[tokio::test]
async fn test_save_leaves_no_temp_files_behind() {
    let dir = tempdir().unwrap();
    save_state(dir.path(), &sample_state()).await.unwrap();

    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec![STATE_FILENAME.to_string()]);
}
