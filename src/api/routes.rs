//! Route configuration.

use crate::api::{handlers, websocket};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // WebSocket
        .route("/ws/status", get(websocket::status_ws_handler))
        .route("/ws/warning", get(websocket::warning_ws_handler))
        // Status containers
        .route(
            "/status",
            get(handlers::get_status)
                .post(handlers::update_status)
                .delete(handlers::clear_status),
        )
        // Warnings
        .route(
            "/warning",
            get(handlers::list_warnings).post(handlers::create_warning),
        )
        .route("/warning/{id}", get(handlers::get_warning))
        .with_state(state)
}
