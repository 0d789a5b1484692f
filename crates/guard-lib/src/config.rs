// ============================
// crates/guard-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use authgate_common::DataSource;
use figment::{Figment, providers::{Env, Format, Toml}};
use serde::Deserialize;

/// Bounds for the unauthenticated window, in seconds.
pub const MIN_DELAY_SECS: u64 = 1;
pub const MAX_DELAY_SECS: u64 = 1024;

/// Guard settings, read once at startup and injected immutably.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Email identifier must be provided for registration.
    pub identifier_required: bool,
    /// Enable the login flow. When both flows are disabled the server is
    /// effectively open to everyone.
    pub enable_login: bool,
    /// Enable the registration flow.
    pub enable_register: bool,
    /// Which backend stores identity records.
    pub data_source: DataSource,
    /// Seconds a connection may stay unauthenticated before being kicked.
    pub delay: u64,
    /// Root directory for the file store.
    pub data_dir: PathBuf,
    /// sqlx connection URL for the database store.
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            identifier_required: false,
            enable_login: false,
            enable_register: false,
            data_source: DataSource::File,
            delay: 60,
            data_dir: PathBuf::from("data"),
            database_url: "sqlite:authgate.db".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `authgate.toml` and `AUTHGATE_`-prefixed
    /// environment variables. A missing file just falls back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("authgate.toml")
    }

    /// Load settings from an explicit file path plus the environment.
    pub fn load_from<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("AUTHGATE_"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject out-of-range values before the guard is built.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DELAY_SECS..=MAX_DELAY_SECS).contains(&self.delay) {
            bail!(
                "delay must be within {MIN_DELAY_SECS}..={MAX_DELAY_SECS} seconds, got {}",
                self.delay
            );
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay)
    }

    /// Whether the guard is active at all (the original opens the server
    /// when both flows are off).
    pub fn guard_enabled(&self) -> bool {
        self.enable_login || self.enable_register
    }
}
