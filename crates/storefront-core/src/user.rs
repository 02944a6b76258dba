//! User entity.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A registered user.
///
/// The password hash is write-only: it is carried in memory for login
/// verification but is never serialized, so cached copies and API responses
/// cannot leak it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,

    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address (unique).
    pub email: String,

    /// Argon2 PHC hash of the password. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,

    /// Age in years.
    pub age: i32,

    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Creates a user from validated input, generating a fresh id and
    /// timestamps.
    #[must_use]
    pub fn from_new(new: NewUser) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: Some(new.password_hash),
            age: new.age,
            phone: new.phone,
            avatar: new.avatar,
            created_at: now,
            updated_at: now,
        }
    }

    /// Drops the password hash, e.g. before handing the record to a cache.
    #[must_use]
    pub fn redacted(mut self) -> Self {
        self.password_hash = None;
        self
    }
}

/// Input for creating a user. The password has already been hashed by the
/// caller; this type never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub age: i32,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new() -> NewUser {
        NewUser {
            name: Some("Alice".to_string()),
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            age: 20,
            phone: None,
            avatar: None,
        }
    }

    #[test]
    fn test_from_new_generates_id_and_timestamps() {
        let user = User::from_new(sample_new());
        assert!(!user.id.is_nil());
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.created_at, user.updated_at);
        assert!(user.password_hash.is_some());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::from_new(sample_new());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_roundtrip_without_hash() {
        let user = User::from_new(sample_new()).redacted();
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
