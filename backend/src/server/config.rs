//! HTTP server configuration object and helpers.

use message_board::domain::NewUser;
use message_board::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_users: Vec<NewUser>,
}

impl ServerConfig {
    /// Construct a server configuration backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            seed_users: Vec::new(),
        }
    }

    /// Attach a database connection pool so messages persist in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Register `user` in the in-memory store when the server starts. Ignored
    /// when a database pool is attached.
    #[must_use]
    pub fn with_seed_user(mut self, user: NewUser) -> Self {
        self.seed_users.push(user);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
