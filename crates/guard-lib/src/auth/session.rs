// ============================
// crates/guard-lib/src/auth/session.rs
// ============================
//! Per-connection authentication state and delay-based expiry.
use dashmap::DashMap;
use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Authentication state of one live connection.
#[derive(Debug)]
pub struct SessionState {
    pub authenticated: bool,
    pub authenticated_at: Option<SystemTime>,
    /// Pending unauthenticated-window timer, aborted on authorize/disconnect.
    expiry: Option<JoinHandle<()>>,
}

impl SessionState {
    fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            authenticated_at: None,
            expiry: None,
        }
    }
}

/// Tracks which connections have authenticated, keyed by identity key.
///
/// State is created on connection start, flipped to authenticated only by a
/// successful login, and destroyed on disconnect. An unauthenticated
/// connection that outlives the configured delay is expired and the kick
/// callback fires; a connection that authenticates first never expires, even
/// if the timer wakes a moment later.
#[derive(Clone)]
pub struct SessionTracker {
    sessions: Arc<DashMap<String, SessionState>>,
    delay: Duration,
}

impl SessionTracker {
    pub fn new(delay: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            delay,
        }
    }

    /// Start tracking a connection in the unauthenticated state.
    /// Idempotent; an already-tracked key keeps its current state.
    pub fn connect(&self, identity_key: &str) {
        self.sessions
            .entry(identity_key.to_string())
            .or_insert_with(SessionState::unauthenticated);
        gauge!("session.active").set(self.sessions.len() as f64);
    }

    /// Mark a connection as authenticated and cancel any pending expiry.
    /// Idempotent: re-authorizing an authenticated connection is a no-op.
    pub fn authorize(&self, identity_key: &str) {
        let mut entry = self
            .sessions
            .entry(identity_key.to_string())
            .or_insert_with(SessionState::unauthenticated);
        if !entry.authenticated {
            entry.authenticated = true;
            entry.authenticated_at = Some(SystemTime::now());
            counter!("session.authenticated").increment(1);
        }
        if let Some(timer) = entry.expiry.take() {
            timer.abort();
        }
    }

    pub fn is_logged(&self, identity_key: &str) -> bool {
        self.sessions
            .get(identity_key)
            .map(|state| state.authenticated)
            .unwrap_or(false)
    }

    /// Drop a connection's state on disconnect.
    pub fn deauthorize(&self, identity_key: &str) {
        if let Some((_, state)) = self.sessions.remove(identity_key) {
            if let Some(timer) = state.expiry {
                timer.abort();
            }
            debug!(identity_key, "session dropped");
            gauge!("session.active").set(self.sessions.len() as f64);
        }
    }

    /// Arm the unauthenticated-window timer for a connection.
    ///
    /// After the configured delay the state is removed and `on_expire` runs,
    /// but only if the connection is still unauthenticated: the removal is a
    /// single atomic check-and-remove, so a login that completes while the
    /// timer is waking wins the race and the timer is a no-op. Re-arming
    /// replaces a previously scheduled timer.
    pub fn schedule_expiry<F>(&self, identity_key: &str, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.connect(identity_key);
        let key = identity_key.to_string();
        let sessions = Arc::clone(&self.sessions);
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let expired = sessions
                .remove_if(&key, |_, state| !state.authenticated)
                .is_some();
            if expired {
                counter!("session.expired").increment(1);
                info!(identity_key = %key, "authentication window elapsed");
                on_expire();
            }
        });
        if let Some(mut entry) = self.sessions.get_mut(identity_key) {
            if let Some(previous) = entry.expiry.replace(timer) {
                previous.abort();
            }
        } else {
            // Disconnected between connect() and here; nothing left to expire.
            timer.abort();
        }
    }

    /// Cancel a pending expiry timer without touching the session state.
    pub fn cancel_expiry(&self, identity_key: &str) {
        if let Some(mut entry) = self.sessions.get_mut(identity_key) {
            if let Some(timer) = entry.expiry.take() {
                timer.abort();
            }
        }
    }
}
