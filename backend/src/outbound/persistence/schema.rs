//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, update this file to match. The
//! `diesel print-schema` command can generate these definitions from a live
//! database.

diesel::table! {
    /// Registered users.
    ///
    /// `messages` is the denormalised list of authored message ids, newest
    /// first. Message writes maintain it inside the same transaction.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name.
        username -> Text,
        /// Encoded Argon2 password digest.
        password -> Text,
        /// Authored message ids, newest first.
        messages -> Array<Uuid>,
    }
}

diesel::table! {
    /// Messages posted by users.
    messages (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        title -> Text,
        body -> Text,
        /// Id of the authoring user.
        author -> Uuid,
    }
}

diesel::allow_tables_to_appear_in_same_query!(messages, users);
