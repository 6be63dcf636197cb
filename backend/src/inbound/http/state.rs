//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{MessageCommand, MessageQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub messages: Arc<dyn MessageQuery>,
    pub messages_command: Arc<dyn MessageCommand>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use message_board::domain::MessageService;
    /// use message_board::inbound::http::state::HttpState;
    /// use message_board::outbound::memory::InMemoryStore;
    ///
    /// let service = Arc::new(MessageService::new(Arc::new(InMemoryStore::new())));
    /// let state = HttpState::new(service.clone(), service);
    /// # let _ = state;
    /// ```
    pub fn new(messages: Arc<dyn MessageQuery>, messages_command: Arc<dyn MessageCommand>) -> Self {
        Self {
            messages,
            messages_command,
        }
    }

    /// Use one service for both the read and the write port.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: MessageQuery + MessageCommand + 'static,
    {
        let messages: Arc<dyn MessageQuery> = service.clone();
        let messages_command: Arc<dyn MessageCommand> = service;
        Self::new(messages, messages_command)
    }
}
