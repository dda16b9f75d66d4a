//! Integration tests for the Market Status API.
//!
//! These tests require the API server to be running. Configure the server URL
//! via the `API_BASE_URL` environment variable (default: `http://localhost:8080`).

use status_client::{ClientConfig, StatusClient, WsClient, WsMessage};
use std::time::Duration;

/// Gets the API base URL from environment or uses default.
#[must_use]
pub fn get_api_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Creates a test client configured for the API.
///
/// # Errors
/// Returns error if client creation fails.
pub fn create_test_client() -> Result<StatusClient, status_client::Error> {
    StatusClient::new(ClientConfig {
        base_url: get_api_url(),
        timeout: Duration::from_secs(10),
    })
}

/// Generates a unique container name to avoid conflicts between tests.
#[must_use]
pub fn unique_container(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{}_{}_{}", prefix, ts, counter)
}

/// Waits up to `secs` for the next non-heartbeat event on `ws`.
///
/// Returns `None` on timeout or when the stream closes.
pub async fn next_event_within(ws: &mut WsClient, secs: u64) -> Option<WsMessage> {
    tokio::time::timeout(Duration::from_secs(secs), ws.next_event())
        .await
        .ok()
        .and_then(Result::ok)
}
