//! Message data model and the payloads that create or change messages.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserId, UserValidationError};

/// Field names reported in validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageField {
    Title,
    Body,
    Author,
}

impl MessageField {
    /// Wire name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
            Self::Author => "author",
        }
    }
}

/// Validation errors raised while building message payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageValidationError {
    #[error("message id must not be empty")]
    EmptyId,
    #[error("message id must be a valid UUID")]
    InvalidId,
    #[error("{} is required", .0.as_str())]
    Missing(MessageField),
    #[error("{} must not be empty", .0.as_str())]
    Blank(MessageField),
    #[error("author must be a valid user id: {0}")]
    InvalidAuthor(UserValidationError),
}

impl MessageValidationError {
    /// The payload field the failure refers to, when there is one.
    #[must_use]
    pub fn field(&self) -> Option<MessageField> {
        match self {
            Self::EmptyId | Self::InvalidId => None,
            Self::Missing(field) | Self::Blank(field) => Some(*field),
            Self::InvalidAuthor(_) => Some(MessageField::Author),
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "invalid_message_id",
            Self::Missing(_) => "missing_field",
            Self::Blank(_) => "empty_field",
            Self::InvalidAuthor(_) => "invalid_author",
        }
    }
}

/// Stable message identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(Uuid);

impl MessageId {
    /// Validate and construct a [`MessageId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, MessageValidationError> {
        let raw = id.as_ref();
        if raw.trim().is_empty() {
            return Err(MessageValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| MessageValidationError::InvalidId)
    }

    /// Generate a fresh identifier for a new message.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<MessageId> for String {
    fn from(value: MessageId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for MessageId {
    type Error = MessageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted message record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub title: String,
    pub body: String,
    pub author: UserId,
}

impl Message {
    /// Materialise a stored message from a validated draft.
    #[must_use]
    pub fn from_draft(id: MessageId, draft: MessageDraft) -> Self {
        let MessageDraft {
            title,
            body,
            author,
        } = draft;
        Self {
            id,
            title,
            body,
            author,
        }
    }

    /// Merge `patch` onto this record; omitted fields keep their values.
    ///
    /// # Examples
    /// ```
    /// use message_board::domain::{Message, MessageId, MessagePatch, UserId};
    ///
    /// let mut message = Message {
    ///     id: MessageId::random(),
    ///     title: "test".to_owned(),
    ///     body: "testing".to_owned(),
    ///     author: UserId::random(),
    /// };
    /// let patch = MessagePatch::try_from_parts(None, Some("changed".to_owned()), None)
    ///     .expect("valid patch");
    /// message.apply(&patch);
    /// assert_eq!(message.title, "test");
    /// assert_eq!(message.body, "changed");
    /// ```
    pub fn apply(&mut self, patch: &MessagePatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(body) = &patch.body {
            self.body.clone_from(body);
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
    }
}

/// Validated payload for creating a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub title: String,
    pub body: String,
    pub author: UserId,
}

impl MessageDraft {
    /// Validate raw request fields. Every field is required.
    pub fn try_from_parts(
        title: Option<String>,
        body: Option<String>,
        author: Option<String>,
    ) -> Result<Self, MessageValidationError> {
        let title = require_text(title, MessageField::Title)?;
        let body = require_text(body, MessageField::Body)?;
        let author = author.ok_or(MessageValidationError::Missing(MessageField::Author))?;
        Ok(Self {
            title,
            body,
            author: parse_author(&author)?,
        })
    }
}

/// Validated partial update for a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<UserId>,
}

impl MessagePatch {
    /// Validate raw request fields. Omitted fields stay `None`; provided ones
    /// follow the same rules as [`MessageDraft`].
    pub fn try_from_parts(
        title: Option<String>,
        body: Option<String>,
        author: Option<String>,
    ) -> Result<Self, MessageValidationError> {
        Ok(Self {
            title: title
                .map(|value| require_text(Some(value), MessageField::Title))
                .transpose()?,
            body: body
                .map(|value| require_text(Some(value), MessageField::Body))
                .transpose()?,
            author: author.as_deref().map(parse_author).transpose()?,
        })
    }

    /// True when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.author.is_none()
    }
}

fn require_text(
    value: Option<String>,
    field: MessageField,
) -> Result<String, MessageValidationError> {
    let value = value.ok_or(MessageValidationError::Missing(field))?;
    if value.trim().is_empty() {
        return Err(MessageValidationError::Blank(field));
    }
    Ok(value)
}

fn parse_author(raw: &str) -> Result<UserId, MessageValidationError> {
    UserId::new(raw).map_err(MessageValidationError::InvalidAuthor)
}
