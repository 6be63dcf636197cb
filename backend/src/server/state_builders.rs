//! Builders for the HTTP state backing the message handlers.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use message_board::domain::{MessageService, NewUser};
use message_board::inbound::http::state::HttpState;
use message_board::outbound::memory::InMemoryStore;
use message_board::outbound::persistence::DieselMessageRepository;

use super::ServerConfig;

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store holding the configured seed users.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "message store selected");
            let repo = Arc::new(DieselMessageRepository::new(pool.clone()));
            HttpState::from_service(Arc::new(MessageService::new(repo)))
        }
        None => {
            info!(store = "memory", "message store selected");
            let repo = Arc::new(seeded_memory_store(&config.seed_users));
            HttpState::from_service(Arc::new(MessageService::new(repo)))
        }
    };
    web::Data::new(state)
}

fn seeded_memory_store(users: &[NewUser]) -> InMemoryStore {
    let store = InMemoryStore::new();
    for user in users {
        match store.insert_user(user) {
            Ok(created) => info!(
                user_id = %created.id(),
                username = created.username().as_ref(),
                "seeded user"
            ),
            Err(err) => warn!(error = %err, "skipped seed user"),
        }
    }
    store
}
