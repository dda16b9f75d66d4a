//! WebSocket client for status and warning streams.

use crate::error::Error;
use crate::types::Warning;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// WebSocket message types received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// WebSocket client for receiving real-time updates.
///
/// The streams are one-way; the client never sends commands.
pub struct WsClient {
    rx: mpsc::Receiver<WsMessage>,
}

impl WsClient {
    /// Connects to a stream.
    ///
    /// # Arguments
    /// * `url` - WebSocket URL (e.g., "ws://localhost:8080/ws/status")
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let (ws_stream, _) = connect_async(url).await.map_err(Box::new)?;
        let (write, mut read) = ws_stream.split();

        let (msg_tx, msg_rx) = mpsc::channel::<WsMessage>(100);

        tokio::spawn(async move {
            // Keeps the sink half alive for as long as the reader runs.
            let _write = write;
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if let Ok(ws_msg) = serde_json::from_str::<WsMessage>(&text)
                            && msg_tx.send(ws_msg).await.is_err()
                        {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Err(_) => break,
                    _ => {}
                }
            }
        });

        Ok(Self { rx: msg_rx })
    }

    /// Receives the next message from the server.
    ///
    /// Returns `None` if the connection is closed.
    pub async fn recv(&mut self) -> Option<WsMessage> {
        self.rx.recv().await
    }

    /// Receives the next message that is neither `connected` nor `heartbeat`.
    ///
    /// # Errors
    /// Returns [`Error::ConnectionClosed`] if the stream ends first.
    pub async fn next_event(&mut self) -> Result<WsMessage, Error> {
        loop {
            match self.recv().await {
                Some(WsMessage::Connected { .. } | WsMessage::Heartbeat { .. }) => continue,
                Some(msg) => return Ok(msg),
                None => return Err(Error::ConnectionClosed),
            }
        }
    }
}
