//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Message, MessageId, PasswordDigest, User, UserId, UserValidationError, Username,
};

use super::schema::{messages, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub messages: Vec<Uuid>,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::new(
            UserId::from_uuid(row.id),
            Username::new(row.username)?,
            PasswordDigest::parse(&row.password)?,
            row.messages.into_iter().map(MessageId::from_uuid).collect(),
        ))
    }
}

/// Insertable struct for creating new user records.
///
/// `messages` is left to the column default (an empty array).
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password: &'a str,
}

/// Row struct for reading from the messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: Uuid,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId::from_uuid(row.id),
            title: row.title,
            body: row.body,
            author: UserId::from_uuid(row.author),
        }
    }
}

/// Insertable and changeset struct for message records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = messages)]
pub(crate) struct MessageRecord<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub author: Uuid,
}

impl<'a> From<&'a Message> for MessageRecord<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            id: *message.id.as_uuid(),
            title: message.title.as_str(),
            body: message.body.as_str(),
            author: *message.author.as_uuid(),
        }
    }
}
