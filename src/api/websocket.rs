//! WebSocket handlers for status and warning notifications.

use crate::state::AppState;
use crate::status::StatusEvent;
use crate::warning::Warning;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Seconds of silence before a heartbeat is sent.
const HEARTBEAT_SECS: u64 = 30;

/// WebSocket message types sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    /// Changed values of one container, nested as `{container: tree}`.
    #[serde(rename = "status")]
    Status(Value),
    /// All containers were dropped.
    #[serde(rename = "cleared")]
    Cleared,
    /// A recorded warning.
    #[serde(rename = "warning")]
    Warning(Warning),
    /// Connection established.
    #[serde(rename = "connected")]
    Connected {
        /// Welcome message.
        message: String,
    },
    /// Heartbeat/ping.
    #[serde(rename = "heartbeat")]
    Heartbeat {
        /// Timestamp in milliseconds.
        timestamp: u64,
    },
}

impl From<StatusEvent> for WsMessage {
    fn from(event: StatusEvent) -> Self {
        match event {
            StatusEvent::Changed { container, states } => {
                let mut data = Map::new();
                data.insert(container, states);
                WsMessage::Status(Value::Object(data))
            }
            StatusEvent::Cleared => WsMessage::Cleared,
        }
    }
}

impl From<Warning> for WsMessage {
    fn from(warning: Warning) -> Self {
        WsMessage::Warning(warning)
    }
}

/// Status change stream.
#[utoipa::path(
    get,
    path = "/ws/status",
    responses(
        (status = 101, description = "WebSocket connection established")
    ),
    tag = "WebSocket"
)]
pub async fn status_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let events = state.store.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, events, "Connected to status stream"))
}

/// Warning stream.
#[utoipa::path(
    get,
    path = "/ws/warning",
    responses(
        (status = 101, description = "WebSocket connection established")
    ),
    tag = "WebSocket"
)]
pub async fn warning_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let events = state.warnings.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, events, "Connected to warning stream"))
}

/// Forwards every event of `events` to one connection until either side closes.
async fn handle_socket<E>(
    socket: WebSocket,
    mut events: broadcast::Receiver<E>,
    greeting: &'static str,
) where
    E: Clone + Send + 'static,
    WsMessage: From<E>,
{
    let (mut sender, mut receiver) = socket.split();

    let connected_msg = WsMessage::Connected {
        message: greeting.to_string(),
    };
    if let Ok(json) = serde_json::to_string(&connected_msg) {
        let _ = sender.send(Message::Text(json.into())).await;
    }

    info!("WebSocket client connected");

    // Clients only listen; incoming frames are drained for close detection.
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    debug!("Ignoring WebSocket message: {}", text);
                }
                Ok(Message::Close(_)) => {
                    info!("WebSocket client disconnected");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Ok(event) => {
                            let msg = WsMessage::from(event);
                            if let Ok(json) = serde_json::to_string(&msg)
                                && sender.send(Message::Text(json.into())).await.is_err() {
                                    break;
                                }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            debug!("WebSocket lagged {} messages", n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            break;
                        }
                    }
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(HEARTBEAT_SECS)) => {
                    let heartbeat = WsMessage::Heartbeat {
                        timestamp: chrono::Utc::now().timestamp_millis() as u64,
                    };
                    if let Ok(json) = serde_json::to_string(&heartbeat)
                        && sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                }
            }
        }
    });

    tokio::select! {
        _ = recv_task => {}
        _ = send_task => {}
    }

    info!("WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_status_message_nests_container() {
        let msg = WsMessage::from(StatusEvent::Changed {
            container: "engine".to_string(),
            states: json!({ "temp": { "core": 71 } }),
        });

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "type": "status", "data": { "engine": { "temp": { "core": 71 } } } })
        );
    }

    #[test]
    fn test_cleared_message() {
        let msg = WsMessage::from(StatusEvent::Cleared);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "type": "cleared" })
        );
    }

    #[test]
    fn test_warning_message() {
        let warning = Warning {
            id: 3,
            time: Utc::now(),
            origin: "feed".to_string(),
            message: "stale quote".to_string(),
            reference: json!({ "symbol": "BTC" }),
        };

        let value = serde_json::to_value(WsMessage::from(warning)).unwrap();
        assert_eq!(value["type"], "warning");
        assert_eq!(value["data"]["id"], 3);
        assert_eq!(value["data"]["ref"]["symbol"], "BTC");
    }

    #[test]
    fn test_connected_message() {
        let msg = WsMessage::Connected {
            message: "hello".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "type": "connected", "data": { "message": "hello" } })
        );
    }
}
