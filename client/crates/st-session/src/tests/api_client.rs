use crate::{ApiClient, ClientError, ClientIdentity};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::eq;
use reqwest::StatusCode;

fn identity() -> ClientIdentity {
    ClientIdentity::new("linux", "1.2.3", "device-1")
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = ApiClient::new("http://localhost:8080/", identity(), Duration::from_secs(5));
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[test]
fn test_identity_and_timeout_kept() {
    let client = ApiClient::new("http://localhost:8080", identity(), Duration::from_secs(5));
    assert_eq!(client.identity(), &identity());
    assert_eq!(client.timeout(), Duration::from_secs(5));
}

#[test]
fn given_gateway_error_body_when_parsing_then_code_and_message_kept() {
    // Given
    let body = br#"{"success":false,"errorCode":"GTW-006","error":"Unauthorized","message":"Token expired"}"#;

    // When
    let err = ApiClient::error_from_body(StatusCode::UNAUTHORIZED, body);

    // Then
    match err {
        ClientError::Api {
            status,
            code,
            message,
            ..
        } => {
            assert_that!(status, eq(401));
            assert_that!(code.as_str(), eq("GTW-006"));
            assert_that!(message.as_str(), eq("Token expired"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn given_error_without_message_when_parsing_then_error_field_used() {
    let err = ApiClient::error_from_body(StatusCode::BAD_REQUEST, br#"{"error":"Bad nickname"}"#);

    assert!(err.to_string().contains("Bad nickname"));
    assert!(err.to_string().contains("HTTP_400"));
}

#[test]
fn given_non_json_error_body_when_parsing_then_reason_phrase_used() {
    let err = ApiClient::error_from_body(StatusCode::BAD_GATEWAY, b"<html>upstream</html>");

    assert_eq!(err.status(), Some(502));
    assert!(err.is_transient());
    assert!(err.to_string().contains("Bad Gateway"));
}

#[test]
fn given_client_errors_when_classifying_then_only_throttling_transient() {
    assert!(ClientError::api(429, "HTTP_429", "slow down").is_transient());
    assert!(ClientError::api(408, "HTTP_408", "timeout").is_transient());
    assert!(!ClientError::api(403, "HTTP_403", "forbidden").is_transient());
    assert!(!ClientError::api(401, "HTTP_401", "no").is_credential_failure());
}
