//! Shared helpers for HTTP integration tests over the in-memory store.
//!
//! Integration tests compile as separate crates under `backend/tests/`; each
//! one uses a subset of these helpers.
#![allow(dead_code, reason = "shared across test crates")]

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use message_board::Trace;
use message_board::domain::ports::UserRepository;
use message_board::domain::{MessageId, MessageService, NewUser, User, UserId};
use message_board::inbound::http::error::unmatched_route;
use message_board::inbound::http::messages;
use message_board::inbound::http::state::HttpState;
use message_board::outbound::memory::InMemoryStore;
use serde_json::{Value, json};

/// In-memory store plus the handler state wired over it.
pub struct MemoryBoard {
    pub store: Arc<InMemoryStore>,
    pub state: web::Data<HttpState>,
}

impl MemoryBoard {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let service = Arc::new(MessageService::new(Arc::clone(&store)));
        Self {
            store,
            state: web::Data::new(HttpState::from_service(service)),
        }
    }

    /// Application with the message routes and trace middleware mounted.
    ///
    /// The returned app owns a clone of the state, so it does not borrow
    /// `self`.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(Trace)
            .configure(messages::configure)
            .default_service(web::to(unmatched_route))
    }

    pub async fn seed_user(&self, username: &str) -> User {
        let new_user = NewUser::try_new(username, "password").expect("valid user");
        UserRepository::insert(self.store.as_ref(), &new_user)
            .await
            .expect("insert user")
    }

    /// Current message list of `id`, newest first.
    pub async fn messages_of(&self, id: &UserId) -> Vec<MessageId> {
        UserRepository::find_by_id(self.store.as_ref(), id)
            .await
            .expect("lookup user")
            .expect("user exists")
            .messages()
            .to_vec()
    }
}

/// Create-message payload authored by `author`.
pub fn create_payload(author: &UserId, title: &str, body: &str) -> Value {
    json!({ "title": title, "body": body, "author": author.to_string() })
}

/// Parse the `_id` field of a message body.
pub fn message_id(body: &Value) -> MessageId {
    MessageId::new(body["_id"].as_str().expect("_id is a string")).expect("_id is a valid id")
}
