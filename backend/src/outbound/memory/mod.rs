//! In-process store implementing the user and message repository ports.
//!
//! All state sits behind one mutex, so every repository call observes and
//! leaves a consistent snapshot: a message and its author's list entry are
//! always written under the same guard. `list` returns messages in insertion
//! order.
//!
//! Used when the server runs without a database URL and as the isolated
//! store for tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    MessageRepository, MessageRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Message, MessageDraft, MessageId, MessagePatch, NewUser, PasswordDigest, User, UserId,
    Username,
};

#[derive(Debug, Clone)]
struct UserRecord {
    username: Username,
    password: PasswordDigest,
    messages: Vec<MessageId>,
}

impl UserRecord {
    fn to_user(&self, id: UserId) -> User {
        User::new(
            id,
            self.username.clone(),
            self.password.clone(),
            self.messages.clone(),
        )
    }

    fn prepend(&mut self, id: MessageId) {
        self.messages.insert(0, id);
    }

    fn remove_first(&mut self, id: &MessageId) {
        if let Some(position) = self.messages.iter().position(|entry| entry == id) {
            self.messages.remove(position);
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, UserRecord>,
    messages: Vec<Message>,
}

impl StoreState {
    fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| &message.id == id)
    }

    fn message_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|message| &message.id == id)
    }
}

/// Mutex-guarded store for users and messages.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use message_board::domain::{MessageService, ports::MessageQuery};
/// use message_board::outbound::memory::InMemoryStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let service = MessageService::new(Arc::new(InMemoryStore::new()));
/// assert!(service.list().await.expect("list").is_empty());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user without an async context, as the server does when it
    /// seeds a database-less store at start-up.
    ///
    /// # Errors
    /// Returns [`UserPersistenceError`] when the username is already taken.
    pub fn insert_user(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock();
        let taken = state
            .users
            .values()
            .any(|record| record.username == user.username);
        if taken {
            return Err(UserPersistenceError::duplicate_username(
                user.username.as_ref(),
            ));
        }

        let id = UserId::random();
        let record = UserRecord {
            username: user.username.clone(),
            password: user.password.clone(),
            messages: Vec::new(),
        };
        let created = record.to_user(id);
        state.users.insert(id, record);
        debug!(user_id = %id, "stored user in memory");
        Ok(created)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        self.insert_user(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock();
        Ok(state.users.get(id).map(|record| record.to_user(*id)))
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Message>, MessageRepositoryError> {
        Ok(self.lock().messages.clone())
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, MessageRepositoryError> {
        Ok(self.lock().message(id).cloned())
    }

    async fn insert_for_author(
        &self,
        draft: &MessageDraft,
    ) -> Result<Message, MessageRepositoryError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let author = state
            .users
            .get_mut(&draft.author)
            .ok_or_else(|| MessageRepositoryError::author_not_found(draft.author.to_string()))?;

        let message = Message::from_draft(MessageId::random(), draft.clone());
        author.prepend(message.id);
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn update(
        &self,
        id: &MessageId,
        patch: &MessagePatch,
    ) -> Result<Option<Message>, MessageRepositoryError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(previous_author) = state.message(id).map(|message| message.author) else {
            return Ok(None);
        };

        if let Some(next_author) = patch.author.filter(|author| *author != previous_author) {
            let next = state.users.get_mut(&next_author).ok_or_else(|| {
                MessageRepositoryError::author_not_found(next_author.to_string())
            })?;
            next.prepend(*id);
            if let Some(previous) = state.users.get_mut(&previous_author) {
                previous.remove_first(id);
            }
        }

        let Some(message) = state.message_mut(id) else {
            return Ok(None);
        };
        message.apply(patch);
        Ok(Some(message.clone()))
    }

    async fn delete_for_author(
        &self,
        id: &MessageId,
    ) -> Result<Option<Message>, MessageRepositoryError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(position) = state.messages.iter().position(|message| &message.id == id) else {
            return Ok(None);
        };

        let removed = state.messages.remove(position);
        match state.users.get_mut(&removed.author) {
            Some(record) => record.remove_first(id),
            None => debug!(message_id = %id, author_id = %removed.author, "author already gone"),
        }
        Ok(Some(removed))
    }
}
