//! Unit tests for error module.

use super::*;

// ============================================================================
// ErrorResponse Tests
// ============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "Something went wrong".to_string(),
        code: "INTERNAL_ERROR".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"error\":\"Something went wrong\""));
    assert!(json.contains("\"code\":\"INTERNAL_ERROR\""));
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_container_not_found_display() {
    let error = ApiError::ContainerNotFound("engine".to_string());
    assert_eq!(format!("{}", error), "Container not found: engine");
}

#[test]
fn test_api_error_warning_not_found_display() {
    let error = ApiError::WarningNotFound(7);
    assert_eq!(format!("{}", error), "Warning not found: 7");
}

#[test]
fn test_api_error_invalid_request_display() {
    let error = ApiError::InvalidRequest("update carries no data".to_string());
    assert_eq!(
        format!("{}", error),
        "Invalid request: update carries no data"
    );
}

// ============================================================================
// ApiError IntoResponse Tests
// ============================================================================

#[test]
fn test_api_error_container_not_found_into_response() {
    let response = ApiError::ContainerNotFound("x".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_api_error_warning_not_found_into_response() {
    let response = ApiError::WarningNotFound(1).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_api_error_invalid_request_into_response() {
    let response = ApiError::InvalidRequest("Bad input".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_api_error_internal_into_response() {
    let response = ApiError::Internal("Server error".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// StateError Mapping Tests
// ============================================================================

#[test]
fn test_state_error_mapping() {
    let invalid: ApiError = StateError::InvalidInput("empty".to_string()).into();
    assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

    let missing: ApiError = StateError::NotFound("c".to_string()).into();
    assert!(matches!(missing, ApiError::ContainerNotFound(ref c) if c == "c"));
    assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

    let broken: ApiError = StateError::InternalInconsistency("node 3".to_string()).into();
    assert_eq!(
        broken.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_api_error_debug() {
    let error = ApiError::ContainerNotFound("engine".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("ContainerNotFound"));
    assert!(debug.contains("engine"));
}
