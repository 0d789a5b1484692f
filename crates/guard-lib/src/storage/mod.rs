// ============================
// crates/guard-lib/src/storage/mod.rs
// ============================
//! Pluggable identity storage.
//!
//! One trait, three variants: [`FileStore`] keeps line-delimited records on
//! disk, [`DatabaseStore`] talks to a SQL table, [`DisabledStore`] refuses
//! everything so callers need no special casing when storage is turned off.

mod database;
mod disabled;
mod file;

pub use database::DatabaseStore;
pub use disabled::DisabledStore;
pub use file::FileStore;

use async_trait::async_trait;
use authgate_common::IdentityRecord;
use thiserror::Error;

/// Storage failures surfaced by [`IdentityStore::add`].
#[derive(Error, Debug)]
pub enum StorageError {
    /// Another record already claims the username, identity key or email.
    #[error("identity already exists")]
    AlreadyExists,

    /// The backend cannot currently be reached. Implementations convert
    /// this into `Ok(false)`/`None` at the trait boundary.
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Trait for identity storage backends.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a record iff no existing record shares its username, identity
    /// key or non-empty email. The check and the insert are atomic under
    /// concurrent callers; this is the authority on the uniqueness
    /// invariant, not any pre-check a caller may have done.
    ///
    /// Returns `Ok(true)` on insert, `Ok(false)` when the backend is
    /// unavailable (the caller treats the identity as not registered),
    /// [`StorageError::AlreadyExists`] on a collision. The `id` on the
    /// passed record is advisory; backends allocate their own.
    async fn add(&self, record: &IdentityRecord) -> Result<bool, StorageError>;

    /// Look up a record by email, username, or either when both are given.
    ///
    /// An unscoped lookup is never permitted: both parameters absent or
    /// empty always yields `None`, whatever the store contains. Backend
    /// unavailability is logged and reads as `None`, so callers treat
    /// "not found" and "store down" uniformly on read paths.
    async fn find(&self, email: Option<&str>, username: Option<&str>)
        -> Option<IdentityRecord>;
}

/// Treat empty or whitespace-only lookup parameters as absent.
fn normalize(param: Option<&str>) -> Option<&str> {
    param.map(str::trim).filter(|value| !value.is_empty())
}
