//! Tests for the error payload formatting and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_to_error_envelope(expected_trace_id: String) {
    let error = Error::not_found("message not found")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "id": "abc" }));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "error": "message not found",
            "code": "not_found",
            "traceId": expected_trace_id,
            "details": { "id": "abc" },
        })
    );
}

#[rstest]
fn serialisation_omits_absent_fields() {
    let value = serde_json::to_value(Error::invalid_request("bad")).expect("serialise error");
    assert_eq!(value, json!({ "error": "bad", "code": "invalid_request" }));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace_id() {
    let ambient = TraceId::generate();
    let decoded: Error = TraceId::scope(ambient, async {
        serde_json::from_value(json!({ "error": "bad", "code": "invalid_request" }))
            .expect("decode error")
    })
    .await;
    assert!(decoded.trace_id().is_none());
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "error": " ", "code": "not_found" }));
    assert!(result.is_err());
}
