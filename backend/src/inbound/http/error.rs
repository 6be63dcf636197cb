//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent JSON responses and status codes.
//! Malformed JSON bodies are routed through [`json_error_handler`] and
//! unmatched routes through [`unmatched_route`] so they share the same
//! envelope.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::{Error, ErrorCode};
use crate::middleware::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        error!(message = error.message(), trace_id = ?error.trace_id(), "internal error");
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Map a JSON extraction failure onto a validation error.
pub(crate) fn invalid_json(err: &JsonPayloadError) -> Error {
    let reason = match err {
        JsonPayloadError::ContentType => "request body must be JSON",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "request body is too large"
        }
        _ => "request body is not valid JSON",
    };
    warn!(error = %err, "rejected request body");
    Error::invalid_request(reason).with_details(json!({
        "code": "invalid_body",
        "reason": err.to_string(),
    }))
}

/// `JsonConfig` error handler rendering body errors in the API envelope.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use message_board::inbound::http::error::json_error_handler;
///
/// let config = web::JsonConfig::default().error_handler(json_error_handler);
/// ```
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    invalid_json(&err).into()
}

/// Default service for requests no route matches, answered in the API
/// envelope instead of an empty 404.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use message_board::inbound::http::error::unmatched_route;
///
/// let app = App::new().default_service(web::to(unmatched_route));
/// # let _ = app;
/// ```
pub async fn unmatched_route(req: HttpRequest) -> ApiResult<HttpResponse> {
    debug!(method = %req.method(), path = req.path(), "no route matched");
    Err(
        Error::not_found(format!("no route for {} {}", req.method(), req.path())).with_details(
            json!({
                "code": "route_not_found",
                "method": req.method().as_str(),
                "path": req.path(),
            }),
        ),
    )
}

#[cfg(test)]
mod tests;
