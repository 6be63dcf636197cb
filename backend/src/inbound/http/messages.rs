//! Message HTTP handlers.
//!
//! ```text
//! GET    /messages
//! GET    /messages/{id}
//! POST   /messages
//! PUT    /messages/{id}
//! DELETE /messages/{id}
//! ```
//!
//! Mutating handlers hand the service call to a spawned task and await its
//! result. If the client disconnects, Actix drops the handler future but the
//! spawned task still runs the store sequence to completion.

use std::future::Future;
use std::sync::Arc;

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::ports::DeletedMessage;
use crate::domain::{
    Error, Message, MessageDraft, MessageField, MessageId, MessagePatch, MessageValidationError,
    TraceId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Confirmation text returned by a successful delete.
pub const DELETED_MESSAGE: &str = "Successfully deleted.";

/// Message representation returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct MessageBody {
    #[serde(rename = "_id")]
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub body: String,
    #[schema(format = "uuid")]
    pub author: String,
}

impl From<Message> for MessageBody {
    fn from(value: Message) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            body: value.body,
            author: value.author.to_string(),
        }
    }
}

/// Response payload wrapping the full message list.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MessageListBody {
    pub messages: Vec<MessageBody>,
}

/// Request payload for creating a message. Every field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateMessageRequest {
    #[schema(example = "Hello")]
    pub title: Option<String>,
    #[schema(example = "First post")]
    pub body: Option<String>,
    #[schema(format = "uuid")]
    pub author: Option<String>,
}

/// Request payload for a partial message update. Omitted fields keep their
/// stored values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateMessageRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    #[schema(format = "uuid")]
    pub author: Option<String>,
}

/// Response payload confirming a delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DeletedMessageBody {
    #[schema(example = "Successfully deleted.")]
    pub message: String,
    #[serde(rename = "_id")]
    #[schema(format = "uuid")]
    pub id: String,
}

impl From<DeletedMessage> for DeletedMessageBody {
    fn from(value: DeletedMessage) -> Self {
        Self {
            message: DELETED_MESSAGE.to_owned(),
            id: value.id.to_string(),
        }
    }
}

fn validation_error(err: MessageValidationError) -> Error {
    let field = err.field().map(MessageField::as_str);
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": err.code(),
    }))
}

fn parse_message_id(raw: &str) -> Result<MessageId, Error> {
    MessageId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "id",
            "value": raw,
            "code": err.code(),
        }))
    })
}

/// Run a store sequence on its own task so it outlives a dropped request.
async fn run_detached<F, T>(task: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(TraceId::in_current_scope(task)).await {
        Ok(result) => result,
        Err(join_error) => {
            error!(error = %join_error, "message task failed to complete");
            Err(Error::internal("message task failed to complete"))
        }
    }
}

/// Register the message routes and their JSON body configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use message_board::inbound::http::messages::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(list_messages)
        .service(get_message)
        .service(create_message)
        .service(update_message)
        .service(delete_message);
}

/// List every message.
#[utoipa::path(
    get,
    path = "/messages",
    responses(
        (status = 200, description = "All messages", body = MessageListBody),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
#[get("/messages")]
pub async fn list_messages(state: web::Data<HttpState>) -> ApiResult<web::Json<MessageListBody>> {
    let messages = state.messages.list().await?;
    Ok(web::Json(MessageListBody {
        messages: messages.into_iter().map(MessageBody::from).collect(),
    }))
}

/// Fetch one message.
#[utoipa::path(
    get,
    path = "/messages/{id}",
    params(("id" = String, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "The message", body = MessageBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "No such message", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "getMessage"
)]
#[get("/messages/{id}")]
pub async fn get_message(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = parse_message_id(&path)?;
    let message = state.messages.get(&id).await?;
    Ok(web::Json(MessageBody::from(message)))
}

/// Create a message and record it on its author.
#[utoipa::path(
    post,
    path = "/messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 200, description = "Message created", body = MessageBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Author does not exist", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "createMessage"
)]
#[post("/messages")]
pub async fn create_message(
    state: web::Data<HttpState>,
    payload: web::Json<CreateMessageRequest>,
) -> ApiResult<web::Json<MessageBody>> {
    let CreateMessageRequest {
        title,
        body,
        author,
    } = payload.into_inner();
    let draft = MessageDraft::try_from_parts(title, body, author).map_err(validation_error)?;
    let command = Arc::clone(&state.messages_command);

    let message = run_detached(async move { command.create(draft).await }).await?;
    Ok(web::Json(MessageBody::from(message)))
}

/// Apply a partial update to a message.
#[utoipa::path(
    put,
    path = "/messages/{id}",
    params(("id" = String, Path, description = "Message identifier")),
    request_body = UpdateMessageRequest,
    responses(
        (status = 200, description = "Updated message", body = MessageBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No such message or author", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "updateMessage"
)]
#[put("/messages/{id}")]
pub async fn update_message(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateMessageRequest>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = parse_message_id(&path)?;
    let UpdateMessageRequest {
        title,
        body,
        author,
    } = payload.into_inner();
    let patch = MessagePatch::try_from_parts(title, body, author).map_err(validation_error)?;
    let command = Arc::clone(&state.messages_command);

    let message = run_detached(async move { command.update(id, patch).await }).await?;
    Ok(web::Json(MessageBody::from(message)))
}

/// Delete a message and drop it from its author's list.
#[utoipa::path(
    delete,
    path = "/messages/{id}",
    params(("id" = String, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message deleted", body = DeletedMessageBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "No such message", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "deleteMessage"
)]
#[delete("/messages/{id}")]
pub async fn delete_message(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedMessageBody>> {
    let id = parse_message_id(&path)?;
    let command = Arc::clone(&state.messages_command);

    let deleted = run_detached(async move { command.delete(id).await }).await?;
    Ok(web::Json(DeletedMessageBody::from(deleted)))
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
