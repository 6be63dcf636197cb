//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn response_body(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("header is ascii").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, body) = response_body(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body,
        json!({
            "error": "Internal server error",
            "code": "internal_error",
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("title must not be empty")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "title", "code": "empty_field"}));

    let (status, header, body) = response_body(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(body["error"], "title must not be empty");
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "title");
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_id_omit_the_header() {
    let (status, header, body) = response_body(&Error::not_found("missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}

#[rstest]
fn actix_errors_become_internal_errors() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream");
    let error = Error::from(actix_error);

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
}

#[rstest]
#[case(JsonPayloadError::ContentType, "request body must be JSON")]
#[case(
    JsonPayloadError::Overflow { limit: 16 },
    "request body is too large"
)]
fn invalid_json_describes_the_failure(#[case] err: JsonPayloadError, #[case] expected: &str) {
    let error = invalid_json(&err);

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), expected);
    let details = error.details().expect("details present");
    assert_eq!(details["code"], "invalid_body");
}
