// ============================
// crates/guard-lib/src/auth/registrator.rs
// ============================
//! Registration orchestration: validate, enforce uniqueness, hash, persist.
use std::sync::Arc;

use authgate_common::{IdentityRecord, RegistrationPayload};
use metrics::counter;
use tracing::{error, info};
use zeroize::Zeroize;

use crate::auth::password;
use crate::error::RegistrationError;
use crate::storage::{IdentityStore, StorageError};
use crate::validation;

pub struct Registrator {
    store: Arc<dyn IdentityStore>,
    enabled: bool,
}

impl Registrator {
    pub fn new(store: Arc<dyn IdentityStore>, enabled: bool) -> Self {
        Self { store, enabled }
    }

    /// Register a new identity.
    ///
    /// The `find` pre-check is an optimization for a friendly early error;
    /// the store's atomic `add` is the authority on uniqueness, so a
    /// collision lost between the two still comes back as
    /// [`RegistrationError::PlayerAlreadyExists`]. A failed registration
    /// leaves no record behind. Plaintext secrets are wiped once hashed.
    pub async fn register(
        &self,
        mut payload: RegistrationPayload,
    ) -> Result<IdentityRecord, RegistrationError> {
        if !self.enabled {
            return Err(RegistrationError::Disabled);
        }
        validation::validate_registration(&payload)?;

        if self
            .store
            .find(payload.email.as_deref(), Some(&payload.username))
            .await
            .is_some()
        {
            return Err(RegistrationError::PlayerAlreadyExists);
        }

        let password_hash = password::hash_password_secure(&mut payload.password)
            .map_err(|err| {
                error!(error = %err, "password hashing failed");
                RegistrationError::Failed
            })?;
        payload.password_confirmation.zeroize();

        let record = IdentityRecord {
            id: 0,
            username: payload.username,
            identity_key: payload.identity_key,
            email: payload
                .email
                .filter(|email| !email.trim().is_empty()),
            password_hash,
            banned: false,
        };

        match self.store.add(&record).await {
            Ok(true) => {
                counter!("guard.registered").increment(1);
                info!(username = %record.username, "identity registered");
                Ok(record)
            }
            Ok(false) => Err(RegistrationError::Failed),
            Err(StorageError::AlreadyExists) => Err(RegistrationError::PlayerAlreadyExists),
            Err(err) => {
                error!(error = %err, "storage rejected new identity");
                Err(RegistrationError::Failed)
            }
        }
    }
}
