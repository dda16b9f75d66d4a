//! Error types for the REST API.

use crate::status::StateError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[cfg(test)]
mod tests;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Status container not found.
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// Warning not found.
    #[error("Warning not found: {0}")]
    WarningNotFound(u64),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::ContainerNotFound(_) => (StatusCode::NOT_FOUND, "CONTAINER_NOT_FOUND"),
            ApiError::WarningNotFound(_) => (StatusCode::NOT_FOUND, "WARNING_NOT_FOUND"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::InvalidInput(msg) => ApiError::InvalidRequest(msg),
            StateError::NotFound(container) => ApiError::ContainerNotFound(container),
            StateError::InternalInconsistency(msg) => ApiError::Internal(msg),
        }
    }
}
