//! WebSocket stream tests.

use serde_json::json;
use status_client::{NewWarning, StatusUpdate, WsClient, WsMessage};
use status_tests::{create_test_client, next_event_within, unique_container};
use std::time::Duration;

#[tokio::test]
async fn test_status_stream_connection() {
    let client = create_test_client().expect("Failed to create client");

    let mut ws = WsClient::connect(&client.status_ws_url())
        .await
        .expect("Failed to connect to WebSocket");

    let first = tokio::time::timeout(Duration::from_secs(5), ws.recv()).await;

    match first {
        Ok(Some(WsMessage::Connected { message })) => assert!(message.contains("Connected")),
        Ok(Some(other)) => panic!("Expected connected message, got {:?}", other),
        Ok(None) => panic!("WebSocket closed unexpectedly"),
        Err(_) => panic!("Timeout waiting for WebSocket message"),
    }
}

#[tokio::test]
async fn test_status_stream_receives_changes() {
    let client = create_test_client().expect("Failed to create client");
    let container = unique_container("stream");

    let mut ws = WsClient::connect(&client.status_ws_url())
        .await
        .expect("Failed to connect to WebSocket");

    let update = StatusUpdate::info(&container)
        .value("a/b", json!(1))
        .value("a/c", json!(2));
    client.post_status(&update).await.expect("Failed to post");

    let changed = StatusUpdate::info(&container)
        .value("a/b", json!(1))
        .value("a/c", json!(5));
    client.post_status(&changed).await.expect("Failed to post");

    // Other tests share the server; skip events for other containers.
    let mut seen = Vec::new();
    while seen.len() < 2 {
        match next_event_within(&mut ws, 5).await {
            Some(WsMessage::Status(data)) if data.get(&container).is_some() => {
                seen.push(data[&container].clone());
            }
            Some(_) => {}
            None => panic!("Timeout waiting for status events"),
        }
    }

    assert_eq!(seen[0], json!({ "a": { "b": 1, "c": 2 } }));
    assert_eq!(seen[1], json!({ "a": { "c": 5 } }));
}

#[tokio::test]
async fn test_warning_stream_receives_warnings() {
    let client = create_test_client().expect("Failed to create client");
    let origin = unique_container("ws_origin");

    let mut ws = WsClient::connect(&client.warning_ws_url())
        .await
        .expect("Failed to connect to WebSocket");

    client
        .create_warning(&NewWarning {
            origin: origin.clone(),
            message: "feed gap".to_string(),
            reference: json!({ "seconds": 4 }),
        })
        .await
        .expect("Failed to create warning");

    loop {
        match next_event_within(&mut ws, 5).await {
            Some(WsMessage::Warning(warning)) if warning.origin == origin => {
                assert_eq!(warning.message, "feed gap");
                break;
            }
            Some(_) => {}
            None => panic!("Timeout waiting for warning event"),
        }
    }
}
