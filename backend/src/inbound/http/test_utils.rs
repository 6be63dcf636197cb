//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::UserRepository;
use crate::domain::{MessageService, NewUser, User};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;

/// Build handler state backed by a fresh in-memory store.
///
/// The store is returned alongside the state so tests can seed users and
/// inspect author lists directly.
pub fn memory_state() -> (Arc<InMemoryStore>, web::Data<HttpState>) {
    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(MessageService::new(Arc::clone(&store)));
    (store, web::Data::new(HttpState::from_service(service)))
}

/// Insert a user with a throwaway password.
pub async fn seed_user(store: &InMemoryStore, username: &str) -> User {
    let new_user = NewUser::try_new(username, "password").expect("valid user");
    UserRepository::insert(store, &new_user)
        .await
        .expect("insert user")
}
