//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MESSAGE_BOARD_*` environment variables, and
//! an optional configuration file, in OrthoConfig's usual precedence order.

use std::net::SocketAddr;
use std::time::Duration;

use message_board::domain::{NewUser, UserValidationError};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Configuration values for the HTTP server and its message store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MESSAGE_BOARD")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Apply pending migrations before serving traffic. Kept off the command
    /// line: an absent boolean flag would load as `Some(false)`.
    #[ortho_config(skip_cli)]
    pub run_migrations: Option<bool>,
    /// Username registered at start-up when running without a database.
    pub seed_username: Option<String>,
    /// Password for [`Self::seed_username`].
    pub seed_password: Option<String>,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the pool size, falling back to the default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Return the connection checkout timeout, falling back to the default.
    pub fn pool_connection_timeout(&self) -> Duration {
        Duration::from_secs(
            self.pool_connection_timeout_secs
                .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
        )
    }

    /// Whether migrations run at start-up. Defaults to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// The user to seed into the in-memory store, if a username is set.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the username is blank or the
    /// password is missing or blank.
    pub fn seed_user(&self) -> Result<Option<NewUser>, UserValidationError> {
        let Some(username) = self.seed_username.as_deref() else {
            return Ok(None);
        };
        let password = self.seed_password.as_deref().unwrap_or_default();
        NewUser::try_new(username, password).map(Some)
    }
}
