//! Port for message persistence, including the author list bookkeeping that
//! must change together with the message record.

use async_trait::async_trait;

use crate::domain::{Message, MessageDraft, MessageId, MessagePatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by message repository adapters.
    pub enum MessageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "message repository query failed: {message}",
        /// The user referenced as author does not exist.
        AuthorNotFound { author_id: String } => "author {author_id} does not exist",
    }
}

/// Store operations over the message collection.
///
/// The three mutating operations are units of work: an adapter either applies
/// every write they describe or none of them, and concurrent calls touching
/// the same author never lose each other's list updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Every stored message in the store's natural order.
    async fn list(&self) -> Result<Vec<Message>, MessageRepositoryError>;

    /// Fetch a message by identifier.
    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, MessageRepositoryError>;

    /// Store a new message under a generated id and prepend that id to the
    /// author's message list.
    ///
    /// Fails with [`MessageRepositoryError::AuthorNotFound`] and stores
    /// nothing when the author is unknown.
    async fn insert_for_author(&self, draft: &MessageDraft)
    -> Result<Message, MessageRepositoryError>;

    /// Merge `patch` onto the stored message and return the stored result.
    ///
    /// Returns `Ok(None)` when no message has this id. When the patch changes
    /// the author, the id moves from the old author's list to the front of
    /// the new author's list.
    async fn update(
        &self,
        id: &MessageId,
        patch: &MessagePatch,
    ) -> Result<Option<Message>, MessageRepositoryError>;

    /// Remove the first occurrence of the id from the author's list, then
    /// delete the message.
    ///
    /// Returns the deleted record, or `Ok(None)` when no message has this id.
    async fn delete_for_author(
        &self,
        id: &MessageId,
    ) -> Result<Option<Message>, MessageRepositoryError>;
}
