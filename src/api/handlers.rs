//! API request handlers.

use crate::error::ApiError;
use crate::models::{
    ClearStatusResponse, HealthResponse, StatusQuery, StatusUpdateRequest, StatusUpdateResponse,
};
use crate::state::AppState;
use crate::warning::{NewWarning, Warning, WarningFilter, WarningSink};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};


// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Status
// ============================================================================

/// Read status containers.
///
/// Without `container` every container is returned keyed by name. With
/// `values`, only the listed paths of that container are returned.
#[utoipa::path(
    get,
    path = "/status",
    params(StatusQuery),
    responses(
        (status = 200, description = "Status tree"),
        (status = 400, description = "Projection without container"),
        (status = 404, description = "Container not found")
    ),
    tag = "Status"
)]
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Value>, ApiError> {
    let paths = query.paths();

    let Some(container) = query.container else {
        if paths.is_some() {
            return Err(ApiError::InvalidRequest(
                "values requires a container".to_string(),
            ));
        }
        let all = state.store.list_all()?;
        return Ok(Json(Value::Object(all.into_iter().collect::<Map<_, _>>())));
    };

    let tree = match paths {
        Some(paths) => state.store.get_paths(&container, &paths)?,
        None => state.store.get(&container)?,
    };
    Ok(Json(tree))
}

/// Push status values into a container.
#[utoipa::path(
    post,
    path = "/status",
    request_body = StatusUpdateRequest,
    responses(
        (status = 201, description = "Update applied", body = StatusUpdateResponse),
        (status = 400, description = "Update carries no data")
    ),
    tag = "Status"
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<(StatusCode, Json<StatusUpdateResponse>), ApiError> {
    let kind = request.update_kind();
    let outcome = state.store.apply(&request.container, &request.data, kind)?;

    if outcome.created {
        info!(
            "Created container {} with {} values",
            request.container,
            outcome.changed.len()
        );
    } else {
        debug!(
            "Container {} changed {} of {} values",
            request.container,
            outcome.changed.len(),
            request.data.len()
        );
    }
    for prefix in &outcome.collisions {
        warn!(
            "Container {}: value at {} replaced by a sub-tree",
            request.container, prefix
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(StatusUpdateResponse::from_outcome(request.container, outcome)),
    ))
}

/// Drop every container.
#[utoipa::path(
    delete,
    path = "/status",
    responses(
        (status = 200, description = "Containers cleared", body = ClearStatusResponse)
    ),
    tag = "Status"
)]
pub async fn clear_status(State(state): State<Arc<AppState>>) -> Json<ClearStatusResponse> {
    let cleared = state.store.clear();
    info!("Cleared {} containers", cleared);
    Json(ClearStatusResponse { cleared })
}

// ============================================================================
// Warnings
// ============================================================================

/// List warnings.
#[utoipa::path(
    get,
    path = "/warning",
    params(WarningFilter),
    responses(
        (status = 200, description = "Recorded warnings, oldest first", body = [Warning])
    ),
    tag = "Warnings"
)]
pub async fn list_warnings(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<WarningFilter>,
) -> Json<Vec<Warning>> {
    Json(state.warnings.list(&filter))
}

/// Get a warning by id.
#[utoipa::path(
    get,
    path = "/warning/{id}",
    params(
        ("id" = u64, Path, description = "Warning identifier")
    ),
    responses(
        (status = 200, description = "Warning", body = Warning),
        (status = 404, description = "Warning not found")
    ),
    tag = "Warnings"
)]
pub async fn get_warning(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Warning>, ApiError> {
    state
        .warnings
        .get(id)
        .map(Json)
        .ok_or(ApiError::WarningNotFound(id))
}

/// Record a warning.
#[utoipa::path(
    post,
    path = "/warning",
    request_body = NewWarning,
    responses(
        (status = 201, description = "Warning recorded", body = Warning)
    ),
    tag = "Warnings"
)]
pub async fn create_warning(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewWarning>,
) -> (StatusCode, Json<Warning>) {
    let warning = state.warnings.record(request);
    info!("Warning {} recorded from {}", warning.id, warning.origin);
    (StatusCode::CREATED, Json(warning))
}
