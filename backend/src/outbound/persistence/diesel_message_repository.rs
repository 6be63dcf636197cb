//! PostgreSQL-backed `MessageRepository` implementation using Diesel ORM.
//!
//! Every write that touches both a message and an author's `messages` list
//! runs in one transaction. The transaction locks the affected `users` rows
//! with `SELECT ... FOR UPDATE` before reading the list, so concurrent writers
//! for the same author queue behind each other instead of overwriting each
//! other's list. Locks are always taken message row first, then user rows in
//! id order.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{Message, MessageDraft, MessageId, MessagePatch};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{MessageRecord, MessageRow};
use super::pool::DbPool;
use super::schema::{messages, users};

/// Diesel-backed implementation of the message repository port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a message transaction; any variant rolls it back.
#[derive(Debug)]
enum TransactionError {
    Diesel(diesel::result::Error),
    AuthorNotFound(Uuid),
}

impl From<diesel::result::Error> for TransactionError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<TransactionError> for MessageRepositoryError {
    fn from(error: TransactionError) -> Self {
        match error {
            TransactionError::Diesel(error) => map_diesel_error(
                error,
                MessageRepositoryError::query,
                MessageRepositoryError::connection,
            ),
            TransactionError::AuthorNotFound(author) => {
                MessageRepositoryError::author_not_found(author.to_string())
            }
        }
    }
}

fn pool_error(error: super::pool::PoolError) -> MessageRepositoryError {
    map_pool_error(error, MessageRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> MessageRepositoryError {
    TransactionError::Diesel(error).into()
}

/// Lock an author's row and return its message list, or `None` when the
/// user does not exist.
async fn lock_author_messages(
    conn: &mut AsyncPgConnection,
    author: Uuid,
) -> Result<Option<Vec<Uuid>>, diesel::result::Error> {
    users::table
        .find(author)
        .select(users::messages)
        .for_update()
        .first::<Vec<Uuid>>(conn)
        .await
        .optional()
}

async fn store_author_messages(
    conn: &mut AsyncPgConnection,
    author: Uuid,
    list: &[Uuid],
) -> Result<(), diesel::result::Error> {
    diesel::update(users::table.find(author))
        .set(users::messages.eq(list))
        .execute(conn)
        .await?;
    Ok(())
}

fn remove_first(list: &mut Vec<Uuid>, id: Uuid) {
    if let Some(position) = list.iter().position(|entry| *entry == id) {
        list.remove(position);
    }
}

/// Move `id` from `previous`'s list to the front of `next`'s list.
///
/// Both rows are locked in id order to keep lock acquisition consistent
/// across concurrent transactions.
async fn move_between_authors(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    previous: Uuid,
    next: Uuid,
) -> Result<(), TransactionError> {
    let mut locked = users::table
        .filter(users::id.eq_any(vec![previous, next]))
        .order(users::id)
        .select((users::id, users::messages))
        .for_update()
        .load::<(Uuid, Vec<Uuid>)>(conn)
        .await?;

    let (_, next_list) = locked
        .iter_mut()
        .find(|(user, _)| *user == next)
        .ok_or(TransactionError::AuthorNotFound(next))?;
    next_list.insert(0, id);

    if let Some((_, list)) = locked.iter_mut().find(|(user, _)| *user == previous) {
        remove_first(list, id);
    }

    for (user, list) in &locked {
        store_author_messages(conn, *user, list).await?;
    }
    Ok(())
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn list(&self) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<MessageRow> = messages::table
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<MessageRow> = messages::table
            .find(*id.as_uuid())
            .select(MessageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(row.map(Message::from))
    }

    async fn insert_for_author(
        &self,
        draft: &MessageDraft,
    ) -> Result<Message, MessageRepositoryError> {
        let message = Message::from_draft(MessageId::random(), draft.clone());
        let id = *message.id.as_uuid();
        let author = *message.author.as_uuid();
        let stored = message.clone();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let outcome: Result<(), TransactionError> = conn
            .transaction(move |conn| {
                async move {
                    let record = MessageRecord::from(&stored);
                    let mut list = lock_author_messages(conn, author)
                        .await?
                        .ok_or(TransactionError::AuthorNotFound(author))?;

                    diesel::insert_into(messages::table)
                        .values(&record)
                        .execute(conn)
                        .await?;

                    list.insert(0, id);
                    store_author_messages(conn, author, &list).await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;
        outcome?;

        debug!(message_id = %message.id, author_id = %message.author, "inserted message");
        Ok(message)
    }

    async fn update(
        &self,
        id: &MessageId,
        patch: &MessagePatch,
    ) -> Result<Option<Message>, MessageRepositoryError> {
        let message_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let updated: Result<Option<Message>, TransactionError> = conn
            .transaction(|conn| {
                async move {
                    let Some(row) = messages::table
                        .find(message_id)
                        .select(MessageRow::as_select())
                        .for_update()
                        .first::<MessageRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };

                    let mut message = Message::from(row);
                    let previous_author = *message.author.as_uuid();
                    message.apply(patch);
                    let next_author = *message.author.as_uuid();

                    if next_author != previous_author {
                        move_between_authors(conn, message_id, previous_author, next_author)
                            .await?;
                    }

                    diesel::update(messages::table.find(message_id))
                        .set(&MessageRecord::from(&message))
                        .execute(conn)
                        .await?;
                    Ok(Some(message))
                }
                .scope_boxed()
            })
            .await;

        Ok(updated?)
    }

    async fn delete_for_author(
        &self,
        id: &MessageId,
    ) -> Result<Option<Message>, MessageRepositoryError> {
        let message_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let removed: Result<Option<Message>, TransactionError> = conn
            .transaction(|conn| {
                async move {
                    let Some(row) = messages::table
                        .find(message_id)
                        .select(MessageRow::as_select())
                        .for_update()
                        .first::<MessageRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };

                    match lock_author_messages(conn, row.author).await? {
                        Some(mut list) => {
                            remove_first(&mut list, message_id);
                            store_author_messages(conn, row.author, &list).await?;
                        }
                        None => debug!(%message_id, author_id = %row.author, "author already gone"),
                    }

                    diesel::delete(messages::table.find(message_id))
                        .execute(conn)
                        .await?;
                    Ok(Some(Message::from(row)))
                }
                .scope_boxed()
            })
            .await;

        Ok(removed?)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for transaction error mapping.
    use super::*;
    use crate::outbound::persistence::PoolError;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(err, MessageRepositoryError::Connection { .. }));
        assert!(
            err.to_string().contains("connection refused"),
            "preserve useful diagnostics"
        );
    }

    #[rstest]
    fn missing_author_maps_to_author_not_found() {
        let author = Uuid::new_v4();
        let err = MessageRepositoryError::from(TransactionError::AuthorNotFound(author));

        assert_eq!(
            err,
            MessageRepositoryError::author_not_found(author.to_string())
        );
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let err = diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(err, MessageRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(vec![1, 2, 1], 1, vec![2, 1])]
    #[case(vec![2, 3], 1, vec![2, 3])]
    #[case(vec![], 1, vec![])]
    fn remove_first_drops_one_occurrence(
        #[case] list: Vec<u128>,
        #[case] target: u128,
        #[case] expected: Vec<u128>,
    ) {
        let mut ids: Vec<Uuid> = list.into_iter().map(Uuid::from_u128).collect();
        remove_first(&mut ids, Uuid::from_u128(target));
        let expected: Vec<Uuid> = expected.into_iter().map(Uuid::from_u128).collect();
        assert_eq!(ids, expected);
    }
}
