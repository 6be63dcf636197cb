//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP and
//! persistence layers, plus the ports adapters implement. Keep types
//! immutable where possible and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload and stable code.
//! - User / UserId / NewUser: registered users and their message lists.
//! - Message / MessageDraft / MessagePatch: messages and validated payloads.
//! - MessageService: implementation of the message driving ports.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
pub mod message;
pub mod message_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::message::{
    Message, MessageDraft, MessageField, MessageId, MessagePatch, MessageValidationError,
};
pub use self::message_service::MessageService;
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, PasswordDigest, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use message_board::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
