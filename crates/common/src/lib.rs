// ================
// crates/common/src/lib.rs
// ================
//! Common types shared between the `AuthGate` engine and its adapters.
//! Adapters build the transient payloads from raw command input; the engine
//! turns them into persisted identity records.

use serde::{Deserialize, Serialize};

/// A persisted identity entry.
///
/// `password_hash` is always a salted one-way hash, never the plaintext
/// secret. `username`, `identity_key` and a non-empty `email` are each
/// globally unique across the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Storage-assigned id. Advisory on insert; backends allocate their own.
    pub id: i64,
    pub username: String,
    /// Stable external identifier (e.g. platform UUID), independent of the
    /// display name.
    pub identity_key: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub banned: bool,
}

impl IdentityRecord {
    /// The record's email, treating an empty string as absent.
    /// Only a non-empty email participates in the uniqueness invariant.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.trim().is_empty())
    }
}

/// Transient input for a registration attempt.
#[derive(Debug, Clone)]
pub struct RegistrationPayload {
    pub identity_key: String,
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub password_confirmation: String,
    /// Whether the adapter's configuration demands an email identifier.
    pub email_required: bool,
}

/// Transient input for a login attempt. The username scopes the store
/// lookup; the identity key names the connection being authenticated.
#[derive(Debug, Clone)]
pub struct LoginPayload {
    pub identity_key: String,
    pub username: String,
    pub password: String,
}

/// Which storage backend holds identity records.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Line-delimited records on the local filesystem.
    #[default]
    File,
    /// SQL table behind a connection pool.
    Database,
    /// No storage at all; registration and login always fail closed.
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IdentityRecord {
        IdentityRecord {
            id: 1,
            username: "alice".to_string(),
            identity_key: "6f9a2f3e".to_string(),
            email: Some("alice@example.com".to_string()),
            password_hash: "$scrypt$...".to_string(),
            banned: false,
        }
    }

    #[test]
    fn test_email_treats_empty_as_absent() {
        let mut rec = record();
        assert_eq!(rec.email(), Some("alice@example.com"));

        rec.email = Some(String::new());
        assert_eq!(rec.email(), None);

        rec.email = Some("   ".to_string());
        assert_eq!(rec.email(), None);

        rec.email = None;
        assert_eq!(rec.email(), None);
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let rec = record();
        let line = serde_json::to_string(&rec).unwrap();
        let back: IdentityRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_data_source_parses_lowercase_names() {
        assert_eq!(
            serde_json::from_str::<DataSource>("\"file\"").unwrap(),
            DataSource::File
        );
        assert_eq!(
            serde_json::from_str::<DataSource>("\"database\"").unwrap(),
            DataSource::Database
        );
        assert_eq!(
            serde_json::from_str::<DataSource>("\"disabled\"").unwrap(),
            DataSource::Disabled
        );
        assert!(serde_json::from_str::<DataSource>("\"mysql\"").is_err());
    }
}
