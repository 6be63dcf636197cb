//! User data model.
//!
//! Users are created outside the HTTP surface (see the `create-user` binary)
//! and carry a denormalised, newest-first list of the messages they authored.

use std::fmt;

use argon2::Argon2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MessageId;

const DIGEST_SCHEME: &str = "argon2id";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("stored password digest is malformed")]
    MalformedDigest,
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    ///
    /// # Examples
    /// ```
    /// use message_board::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(UserId::new("cccccccccccc").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login name; expected to be unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Salted Argon2 digest of a user's password.
///
/// Stored as `argon2id$<salt-hex>$<hash-hex>`; the plaintext is never kept.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: [u8; SALT_LEN],
    hash: [u8; HASH_LEN],
}

impl PasswordDigest {
    /// Hash `password` under a freshly generated salt.
    ///
    /// # Examples
    /// ```
    /// use message_board::domain::PasswordDigest;
    ///
    /// let digest = PasswordDigest::from_plaintext("hunter2").expect("hash password");
    /// assert!(digest.verify("hunter2"));
    /// assert!(!digest.verify("hunter3"));
    /// ```
    pub fn from_plaintext(password: &str) -> Result<Self, UserValidationError> {
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        let salt: [u8; SALT_LEN] = rand::thread_rng().r#gen();
        let hash = derive_hash(password, &salt)?;
        Ok(Self { salt, hash })
    }

    /// Parse the stored representation produced by [`PasswordDigest::encode`].
    pub fn parse(encoded: &str) -> Result<Self, UserValidationError> {
        let mut parts = encoded.split('$');
        let (Some(DIGEST_SCHEME), Some(salt_hex), Some(hash_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(UserValidationError::MalformedDigest);
        };

        let mut salt = [0_u8; SALT_LEN];
        let mut hash = [0_u8; HASH_LEN];
        hex::decode_to_slice(salt_hex, &mut salt)
            .map_err(|_| UserValidationError::MalformedDigest)?;
        hex::decode_to_slice(hash_hex, &mut hash)
            .map_err(|_| UserValidationError::MalformedDigest)?;
        Ok(Self { salt, hash })
    }

    /// Render the digest for storage.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{DIGEST_SCHEME}${}${}",
            hex::encode(self.salt),
            hex::encode(self.hash)
        )
    }

    /// Check `password` against the stored digest.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        derive_hash(password, &self.salt).is_ok_and(|hash| hash == self.hash)
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

fn derive_hash(password: &str, salt: &[u8]) -> Result<[u8; HASH_LEN], UserValidationError> {
    let mut hash = [0_u8; HASH_LEN];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut hash)
        .map_err(|err| UserValidationError::Hashing {
            message: err.to_string(),
        })?;
    Ok(hash)
}

/// Registration payload for a user that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub password: PasswordDigest,
}

impl NewUser {
    /// Validate the username and hash the password.
    pub fn try_new(username: &str, password: &str) -> Result<Self, UserValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: PasswordDigest::from_plaintext(password)?,
        })
    }
}

/// Persisted user record.
///
/// ## Invariants
/// - `messages` lists the ids of messages whose `author` is this user,
///   newest first. Store adapters maintain it; nothing else mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    password: PasswordDigest,
    messages: Vec<MessageId>,
}

impl User {
    /// Assemble a user from its stored parts.
    #[must_use]
    pub fn new(
        id: UserId,
        username: Username,
        password: PasswordDigest,
        messages: Vec<MessageId>,
    ) -> Self {
        Self {
            id,
            username,
            password,
            messages,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password digest.
    #[must_use]
    pub fn password(&self) -> &PasswordDigest {
        &self.password
    }

    /// Authored message ids, newest first.
    #[must_use]
    pub fn messages(&self) -> &[MessageId] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("cccccccccccc", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn user_id_serialises_as_string() {
        let id = UserId::random();
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn username_rejects_blank(#[case] raw: &str) {
        assert_eq!(Username::new(raw), Err(UserValidationError::EmptyUsername));
    }

    #[rstest]
    fn digest_round_trips_through_storage_form() {
        let digest = PasswordDigest::from_plaintext("password").expect("hash password");
        let parsed = PasswordDigest::parse(&digest.encode()).expect("parse digest");
        assert_eq!(parsed, digest);
        assert!(parsed.verify("password"));
    }

    #[rstest]
    fn digests_use_distinct_salts() {
        let first = PasswordDigest::from_plaintext("password").expect("hash password");
        let second = PasswordDigest::from_plaintext("password").expect("hash password");
        assert_ne!(first.encode(), second.encode());
    }

    #[rstest]
    #[case("password")]
    #[case("argon2id$zz$00")]
    #[case("argon2id$00112233445566778899aabbccddeeff")]
    #[case("bcrypt$00112233445566778899aabbccddeeff$00")]
    fn parse_rejects_malformed_digests(#[case] encoded: &str) {
        assert_eq!(
            PasswordDigest::parse(encoded),
            Err(UserValidationError::MalformedDigest)
        );
    }

    #[rstest]
    fn debug_output_hides_digest() {
        let digest = PasswordDigest::from_plaintext("password").expect("hash password");
        assert_eq!(format!("{digest:?}"), "PasswordDigest(..)");
    }

    #[rstest]
    fn new_user_rejects_empty_password() {
        assert_eq!(
            NewUser::try_new("user1", ""),
            Err(UserValidationError::EmptyPassword)
        );
    }
}
