//! Outbound adapters implementing domain ports for the message store.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: mutex-guarded in-process store for database-less runs and
//!   tests
//!
//! Adapters translate between domain types and storage representations.
//! The only logic they own is keeping each author's message list in step
//! with message writes, atomically.

pub mod memory;
pub mod persistence;
