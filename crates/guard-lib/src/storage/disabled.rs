// ============================
// crates/guard-lib/src/storage/disabled.rs
// ============================
//! The null store: every insert fails closed and every lookup misses,
//! which disables registration and login without special-casing callers.
use authgate_common::IdentityRecord;
use async_trait::async_trait;

use super::{IdentityStore, StorageError};

pub struct DisabledStore;

#[async_trait]
impl IdentityStore for DisabledStore {
    async fn add(&self, _record: &IdentityRecord) -> Result<bool, StorageError> {
        Ok(false)
    }

    async fn find(&self, _email: Option<&str>, _username: Option<&str>) -> Option<IdentityRecord> {
        None
    }
}
