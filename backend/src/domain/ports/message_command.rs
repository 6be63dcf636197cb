//! Driving port for creating, changing, and deleting messages.

use async_trait::async_trait;

use crate::domain::{Error, Message, MessageDraft, MessageId, MessagePatch};

/// Confirmation returned once a message and its author-list entry are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedMessage {
    pub id: MessageId,
}

/// Write-side use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageCommand: Send + Sync {
    /// Store a message and record it at the front of its author's list.
    async fn create(&self, draft: MessageDraft) -> Result<Message, Error>;

    /// Apply a partial update and return the stored result.
    async fn update(&self, id: MessageId, patch: MessagePatch) -> Result<Message, Error>;

    /// Delete a message and drop it from its author's list.
    async fn delete(&self, id: MessageId) -> Result<DeletedMessage, Error>;
}
