//! # Market Status Backend - REST and WebSocket Server
//!
//! A backend that keeps named status containers as hierarchical trees.
//! Producers push flat maps of `/`-delimited paths; the server nests them,
//! merges them into the existing tree, reports exactly what changed and
//! streams those changes to WebSocket subscribers. Updates of kind
//! `warning` also record an entry in the warning log.
//!
//! Built with [Axum](https://crates.io/crates/axum) for async HTTP handling and
//! provides OpenAPI/Swagger documentation via [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Path-keyed state**: `{"subdata/sub1": 1}` becomes `{"subdata": {"sub1": 1}}`.
//!
//! - **Minimal change-sets**: an update reports only the paths whose value
//!   actually differs from the stored one.
//!
//! - **Projection**: read selected paths of a container with
//!   `?values=[a,subdata/sub2]`.
//!
//! - **Live streams**: change and warning notifications over WebSocket.
//!
//! - **Optional persistence**: warnings are written to PostgreSQL when a
//!   database URL is configured.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`status`] | The state engine: paths, trees, diff, projection, store |
//! | [`warning`] | Warning log and the sink used by `warning` updates |
//! | [`api`] | Route handlers, WebSocket streams and router configuration |
//! | [`config`] | TOML configuration with environment overrides |
//! | [`db`] | Optional PostgreSQL persistence for warnings |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/status` | All containers, one container, or a projection |
//! | POST | `/status` | Push values into a container |
//! | DELETE | `/status` | Drop every container |
//! | GET | `/warning` | List warnings, filter by `origin` or `message` |
//! | GET | `/warning/{id}` | Get one warning |
//! | POST | `/warning` | Record a warning |
//! | GET | `/ws/status` | Change stream |
//! | GET | `/ws/warning` | Warning stream |
//!
//! ## Example Usage
//!
//! ```bash
//! # Create a container
//! curl -X POST http://localhost:8080/status \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "info", "container": "container1", "data": {"data1": "value1", "subdata/sub1": 1}}'
//!
//! # Read part of it
//! curl "http://localhost:8080/status?container=container1&values=[subdata/sub1]"
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
pub mod status;
pub mod warning;
