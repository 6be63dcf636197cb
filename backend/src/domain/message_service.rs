//! Message domain service.
//!
//! Implements the message driving ports on top of a [`MessageRepository`].
//! The repository owns atomicity of the message/author-list writes; this
//! service translates its outcomes into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    DeletedMessage, MessageCommand, MessageQuery, MessageRepository, MessageRepositoryError,
};
use crate::domain::{Error, Message, MessageDraft, MessageField, MessageId, MessagePatch, TraceId};

fn map_repository_error(err: MessageRepositoryError) -> Error {
    let trace_id = TraceId::current().map(|id| id.to_string());
    match err {
        MessageRepositoryError::Connection { message } => {
            warn!(trace_id = ?trace_id, %message, "message store unavailable");
            Error::service_unavailable(format!("message store unavailable: {message}"))
        }
        MessageRepositoryError::Query { message } => {
            error!(trace_id = ?trace_id, %message, "message store query failed");
            Error::internal(format!("message store error: {message}"))
        }
        MessageRepositoryError::AuthorNotFound { author_id } => {
            warn!(trace_id = ?trace_id, %author_id, "author does not exist");
            Error::not_found(format!("author {author_id} not found")).with_details(json!({
                "field": MessageField::Author.as_str(),
                "value": author_id,
                "code": "author_not_found",
            }))
        }
    }
}

fn message_not_found(id: &MessageId) -> Error {
    Error::not_found(format!("message {id} not found")).with_details(json!({
        "id": id.to_string(),
        "code": "message_not_found",
    }))
}

/// Message service implementing [`MessageQuery`] and [`MessageCommand`].
#[derive(Clone)]
pub struct MessageService<R> {
    repo: Arc<R>,
}

impl<R> MessageService<R> {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> MessageQuery for MessageService<R>
where
    R: MessageRepository,
{
    async fn list(&self) -> Result<Vec<Message>, Error> {
        let messages = self.repo.list().await.map_err(map_repository_error)?;
        debug!(count = messages.len(), "listed messages");
        Ok(messages)
    }

    async fn get(&self, id: &MessageId) -> Result<Message, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| message_not_found(id))
    }
}

#[async_trait]
impl<R> MessageCommand for MessageService<R>
where
    R: MessageRepository,
{
    async fn create(&self, draft: MessageDraft) -> Result<Message, Error> {
        let message = self
            .repo
            .insert_for_author(&draft)
            .await
            .map_err(map_repository_error)?;
        debug!(message_id = %message.id, author_id = %message.author, "created message");
        Ok(message)
    }

    async fn update(&self, id: MessageId, patch: MessagePatch) -> Result<Message, Error> {
        if patch.is_empty() {
            return self.get(&id).await;
        }

        let message = self
            .repo
            .update(&id, &patch)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| message_not_found(&id))?;
        debug!(message_id = %id, author_changed = patch.author.is_some(), "updated message");
        Ok(message)
    }

    async fn delete(&self, id: MessageId) -> Result<DeletedMessage, Error> {
        let removed = self
            .repo
            .delete_for_author(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| message_not_found(&id))?;
        debug!(message_id = %id, author_id = %removed.author, "deleted message");
        Ok(DeletedMessage { id })
    }
}

#[cfg(test)]
#[path = "message_service_tests.rs"]
mod tests;
