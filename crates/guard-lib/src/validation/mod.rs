// ============================
// crates/guard-lib/src/validation/mod.rs
// ============================
//! Payload validation module. Pure checks, no I/O.

use authgate_common::{LoginPayload, RegistrationPayload};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password confirmation does not match")]
    WrongPasswordConfirmation,
}

/// Result type for validation operations
pub type ValidationResult = Result<(), ValidationError>;

/// Validate a registration payload.
///
/// Field presence is checked first, then the confirmation, then the email
/// shape. When `email_required` is set, an absent or malformed email fails
/// with [`ValidationError::InvalidEmail`]; an optional email is still shape
/// checked whenever one is supplied, since a non-empty email enters the
/// uniqueness invariant.
pub fn validate_registration(payload: &RegistrationPayload) -> ValidationResult {
    if payload.username.trim().is_empty() {
        return Err(ValidationError::MissingField("username"));
    }
    if payload.identity_key.trim().is_empty() {
        return Err(ValidationError::MissingField("identity key"));
    }
    if payload.password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    if payload.password != payload.password_confirmation {
        return Err(ValidationError::WrongPasswordConfirmation);
    }
    match payload.email.as_deref().map(str::trim) {
        None | Some("") => {
            if payload.email_required {
                return Err(ValidationError::InvalidEmail);
            }
        }
        Some(email) => validate_email(email)?,
    }
    Ok(())
}

/// Validate a login payload: the secret and both identity fields must be set.
pub fn validate_login(payload: &LoginPayload) -> ValidationResult {
    if payload.username.trim().is_empty() {
        return Err(ValidationError::MissingField("username"));
    }
    if payload.identity_key.trim().is_empty() {
        return Err(ValidationError::MissingField("identity key"));
    }
    if payload.password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    Ok(())
}

/// Validate an email address shape.
pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty()
        || email.len() > MAX_EMAIL_LENGTH
        || !EMAIL_REGEX.is_match(email)
    {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}
