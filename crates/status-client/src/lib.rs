//! HTTP client library for the Market Status API.
//!
//! This crate provides a typed client for the status backend: pushing and
//! reading status containers, the warning log, and the WebSocket change
//! and warning streams.
//!
//! # Example
//!
//! ```no_run
//! use status_client::{StatusClient, StatusUpdate};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), status_client::Error> {
//!     let client = StatusClient::with_base_url("http://localhost:8080")?;
//!
//!     let update = StatusUpdate::info("engine")
//!         .value("temp/core", json!(71))
//!         .value("mode", json!("live"));
//!     let outcome = client.post_status(&update).await?;
//!     println!("changed: {:?}", outcome.changed);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;
mod websocket;

pub use client::{ClientConfig, StatusClient};
pub use error::Error;
pub use types::*;
pub use websocket::{WsClient, WsMessage};
