// ============================
// crates/guard-lib/src/auth/authenticator.rs
// ============================
//! Login orchestration: lookup, verify, ban check, session transition.
use std::sync::Arc;

use authgate_common::{IdentityRecord, LoginPayload};
use metrics::counter;
use tracing::{info, warn};

use crate::auth::password;
use crate::auth::session::SessionTracker;
use crate::error::LoginError;
use crate::storage::IdentityStore;
use crate::validation;

pub struct Authenticator {
    store: Arc<dyn IdentityStore>,
    sessions: SessionTracker,
    enabled: bool,
}

impl Authenticator {
    pub fn new(store: Arc<dyn IdentityStore>, sessions: SessionTracker, enabled: bool) -> Self {
        Self {
            store,
            sessions,
            enabled,
        }
    }

    /// Authenticate an identity and mark its connection as logged in.
    ///
    /// [`LoginError::UnknownIdentity`] and [`LoginError::WrongPassword`] are
    /// distinct kinds for callers that count failures, but their sanitized
    /// presentation is identical so usernames cannot be enumerated.
    pub async fn login(&self, payload: LoginPayload) -> Result<IdentityRecord, LoginError> {
        if !self.enabled {
            return Err(LoginError::Disabled);
        }
        validation::validate_login(&payload)?;

        let record = self
            .store
            .find(None, Some(&payload.username))
            .await
            .ok_or(LoginError::UnknownIdentity)?;

        if record.banned {
            warn!(username = %record.username, "banned identity attempted login");
            return Err(LoginError::Banned);
        }
        if !password::verify_password(&record.password_hash, &payload.password) {
            counter!("guard.login_failed").increment(1);
            return Err(LoginError::WrongPassword);
        }

        self.sessions.authorize(&payload.identity_key);
        counter!("guard.login_ok").increment(1);
        info!(username = %record.username, "identity authenticated");
        Ok(record)
    }

    /// Whether the connection behind `identity_key` has authenticated.
    pub fn is_logged(&self, identity_key: &str) -> bool {
        self.sessions.is_logged(identity_key)
    }
}
