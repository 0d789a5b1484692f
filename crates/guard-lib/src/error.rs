// ============================
// crates/guard-lib/src/error.rs
// ============================
//! Operation-level error types returned to adapters.
//!
//! Adapters are the only consumers of these kinds; they translate them into
//! user-facing text. `sanitized_message` is the translation safe to put in
//! front of a connecting player.
use thiserror::Error;

use crate::validation::ValidationError;

/// Why a registration attempt failed.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("an identity with the same username, key or email already exists")]
    PlayerAlreadyExists,

    #[error("registration is disabled")]
    Disabled,

    /// Generic failure, deliberately carrying no backend detail.
    #[error("registration failed")]
    Failed,
}

/// Why a login attempt failed.
#[derive(Error, Debug)]
pub enum LoginError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown identity")]
    UnknownIdentity,

    #[error("wrong password")]
    WrongPassword,

    #[error("identity is banned")]
    Banned,

    #[error("login is disabled")]
    Disabled,
}

impl RegistrationError {
    /// Message suitable for the connecting player.
    pub fn sanitized_message(&self) -> String {
        match self {
            RegistrationError::Validation(err) => err.to_string(),
            RegistrationError::PlayerAlreadyExists => {
                "this identity is already registered".to_string()
            }
            RegistrationError::Disabled => "registration is disabled".to_string(),
            RegistrationError::Failed => "registration failed, try again later".to_string(),
        }
    }
}

impl LoginError {
    /// Message suitable for the connecting player.
    ///
    /// Unknown identities and wrong passwords read identically so the
    /// response cannot be used to enumerate registered usernames.
    pub fn sanitized_message(&self) -> String {
        match self {
            LoginError::Validation(err) => err.to_string(),
            LoginError::UnknownIdentity | LoginError::WrongPassword => {
                "invalid username or password".to_string()
            }
            LoginError::Banned => "you are banned from this server".to_string(),
            LoginError::Disabled => "login is disabled".to_string(),
        }
    }
}
