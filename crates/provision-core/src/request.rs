//! Provisioning request input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::AccountKey;

/// Maximum length of a contact email in bytes.
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum length of a display name in bytes.
pub const MAX_DISPLAY_NAME_LEN: usize = 256;

/// Transient input for a provisioning call.
///
/// Consumed once per call and never persisted; the durable state lives in the
/// `CustomerLink` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// The account to provision a customer identity for.
    pub account_key: AccountKey,

    /// Human-readable name forwarded to the provider.
    pub display_name: String,

    /// Contact email forwarded to the provider.
    pub contact_email: String,

    /// Free-form metadata forwarded to the provider.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ProvisionRequest {
    /// Validate the request fields beyond what deserialization enforces.
    ///
    /// The account key is already validated by its own type; this checks the
    /// display name and contact email.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.display_name.trim().is_empty() {
            return Err(RequestError::EmptyDisplayName);
        }
        if self.display_name.len() > MAX_DISPLAY_NAME_LEN {
            return Err(RequestError::DisplayNameTooLong {
                max: MAX_DISPLAY_NAME_LEN,
            });
        }
        validate_email(&self.contact_email)
    }
}

/// Syntactic email validation.
///
/// This is deliberately shallow: one `@`, a non-empty local part, a domain
/// containing a dot, no whitespace. Deliverability is the provider's problem.
///
/// # Errors
///
/// Returns `RequestError::InvalidEmail` when the address is malformed.
pub fn validate_email(email: &str) -> Result<(), RequestError> {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(RequestError::InvalidEmail);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(RequestError::InvalidEmail);
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(RequestError::InvalidEmail),
    };

    if local.is_empty() || domain.is_empty() {
        return Err(RequestError::InvalidEmail);
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(RequestError::InvalidEmail);
    }

    Ok(())
}

/// Errors produced by request validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The display name is empty or whitespace.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The display name exceeds the maximum length.
    #[error("display name too long (max {max} bytes)")]
    DisplayNameTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// The contact email is not syntactically valid.
    #[error("contact email is not a valid address")]
    InvalidEmail,
}
