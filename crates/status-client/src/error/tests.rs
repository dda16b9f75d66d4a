//! Unit tests for error module.

use super::*;

#[test]
fn test_api_error_display() {
    let error = Error::Api {
        status: 400,
        message: "Bad request".to_string(),
    };

    let display = format!("{}", error);
    assert!(display.contains("400"));
    assert!(display.contains("Bad request"));
}

#[test]
fn test_not_found_error_display() {
    let error = Error::NotFound("container1".to_string());

    let display = format!("{}", error);
    assert!(display.contains("Not found"));
    assert!(display.contains("container1"));
}

#[test]
fn test_connection_closed_display() {
    assert_eq!(Error::ConnectionClosed.to_string(), "Connection closed");
}

#[test]
fn test_json_error_from() {
    let json_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::Json(_)));
}

#[test]
fn test_invalid_url_from() {
    let parse_error = url::Url::parse("not a url").unwrap_err();
    let error: Error = parse_error.into();
    assert!(error.to_string().starts_with("Invalid URL"));
}
