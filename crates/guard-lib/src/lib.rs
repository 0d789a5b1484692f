// ============================
// crates/guard-lib/src/lib.rs
// ============================
//! Core engine for the `AuthGate` multiplayer authentication guard.
//!
//! Adapters (command layers, server event hooks) build payloads from raw
//! input, call [`Registrator::register`] / [`Authenticator::login`], and
//! consult the [`SessionTracker`] on every connection event. Everything here
//! returns typed outcomes; presentation stays with the adapter.

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use authgate_common::DataSource;

use crate::auth::{Authenticator, Registrator, SessionTracker};
use crate::config::Settings;
use crate::storage::{DatabaseStore, DisabledStore, FileStore, IdentityStore};

/// Aggregate guard state shared with adapters.
#[derive(Clone)]
pub struct Guard {
    pub registrator: Arc<Registrator>,
    pub authenticator: Arc<Authenticator>,
    pub sessions: SessionTracker,
    pub settings: Arc<Settings>,
}

impl Guard {
    /// Build a guard from settings, selecting the storage variant once at
    /// startup. Backend construction failures are fatal here, not at call
    /// time.
    pub async fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let store: Arc<dyn IdentityStore> = match settings.data_source {
            DataSource::File => Arc::new(FileStore::new(&settings.data_dir)?),
            DataSource::Database => {
                Arc::new(DatabaseStore::connect(&settings.database_url).await?)
            }
            DataSource::Disabled => Arc::new(DisabledStore),
        };
        Ok(Self::new(store, settings))
    }

    /// Wire the guard around an injected store.
    pub fn new(store: Arc<dyn IdentityStore>, settings: Settings) -> Self {
        let sessions = SessionTracker::new(settings.delay());
        let registrator = Arc::new(Registrator::new(
            Arc::clone(&store),
            settings.enable_register,
        ));
        let authenticator = Arc::new(Authenticator::new(
            store,
            sessions.clone(),
            settings.enable_login,
        ));
        Self {
            registrator,
            authenticator,
            sessions,
            settings: Arc::new(settings),
        }
    }
}
