//! Driving port for reading messages.

use async_trait::async_trait;

use crate::domain::{Error, Message, MessageId};

/// Read-side use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageQuery: Send + Sync {
    /// Every stored message.
    async fn list(&self) -> Result<Vec<Message>, Error>;

    /// One message; a missing id is an [`crate::domain::ErrorCode::NotFound`]
    /// error.
    async fn get(&self, id: &MessageId) -> Result<Message, Error>;
}
