//! Loading replay fixtures from disk.

mod common;

use std::io::Write;
use std::sync::Arc;

use replay::{ReplayError, ReplayPerformer};
use serde_json::json;
use social::{RequestError, TransportError};

use common::{adapter, init_tracing, request};

const FIXTURE: &str = r#"{
  "recordings": [
    {
      "endpoint": "https://graph.facebook.com/me",
      "delay_ms": 10,
      "outcome": { "kind": "json", "body": { "id": "42", "name": "ok" } }
    },
    {
      "endpoint": "https://graph.facebook.com/me/friends",
      "outcome": {
        "kind": "failure",
        "error": { "kind": "network_unavailable", "message": "offline" }
      }
    }
  ]
}"#;

#[tokio::test]
async fn fixture_file_drives_the_adapter() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();

    let performer = Arc::new(ReplayPerformer::from_fixture_file(file.path()).unwrap());
    let adapter = adapter(performer);

    let me = adapter
        .fetch_mapping(&request("https://graph.facebook.com/me"))
        .await
        .unwrap();
    assert_eq!(json!(me), json!({"id": "42", "name": "ok"}));

    let err = adapter
        .fetch_sequence(&request("https://graph.facebook.com/me/friends"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RequestError::Transport(TransportError::NetworkUnavailable {
            message: "offline".into()
        })
    );
}

#[tokio::test]
async fn missing_fixture_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = ReplayPerformer::from_fixture_file(&path).unwrap_err();
    assert!(matches!(err, ReplayError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[tokio::test]
async fn invalid_fixture_is_rejected() {
    let err = ReplayPerformer::from_fixture_json(r#"{"recordings":[{"endpoint":"x"}]}"#)
        .unwrap_err();
    assert!(matches!(err, ReplayError::Fixture(_)));
}
