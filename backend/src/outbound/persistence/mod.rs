//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the message and user repository ports backed
//! by PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types, plus the author-list bookkeeping that must share a
//!   transaction with message writes.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map to the port errors.
//!
//! # Example
//!
//! ```no_run
//! use message_board::outbound::persistence::{DbPool, DieselMessageRepository, PoolConfig};
//!
//! # async fn build() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/board")).await?;
//! let repo = DieselMessageRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_helpers;
mod diesel_message_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
