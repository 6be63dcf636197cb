//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound store adapters.
//! Driving ports (`MessageQuery`, `MessageCommand`) are implemented by domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod message_command;
mod message_query;
mod message_repository;
mod user_repository;

#[cfg(test)]
pub use message_command::MockMessageCommand;
pub use message_command::{DeletedMessage, MessageCommand};
#[cfg(test)]
pub use message_query::MockMessageQuery;
pub use message_query::MessageQuery;
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessageRepository, MessageRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
