//! Identifier types for the provisioning service.
//!
//! The account key is issued by the authentication subsystem and is opaque to
//! this service: it may be a user id, an organization id, or any other stable
//! handle. Validation here is purely syntactic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of an account key in bytes.
pub const MAX_ACCOUNT_KEY_LEN: usize = 128;

/// An opaque identifier for the internal entity being provisioned.
///
/// Account keys are supplied by the authentication subsystem and are never
/// generated by this service. A key is well-formed when it is non-empty, at
/// most [`MAX_ACCOUNT_KEY_LEN`] bytes, and consists of ASCII alphanumerics
/// plus `-`, `_`, `.`, and `:`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountKey(String);

impl AccountKey {
    /// Parse and validate an account key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty, too long, or contains
    /// characters outside the allowed set.
    pub fn new(key: impl Into<String>) -> Result<Self, IdError> {
        let key = key.into();

        if key.is_empty() {
            return Err(IdError::Empty);
        }
        if key.len() > MAX_ACCOUNT_KEY_LEN {
            return Err(IdError::TooLong {
                len: key.len(),
                max: MAX_ACCOUNT_KEY_LEN,
            });
        }
        if !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
        {
            return Err(IdError::InvalidCharacter);
        }

        Ok(Self(key))
    }

    /// Return the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the bytes of the key.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for AccountKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountKey({})", self.0)
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountKey {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountKey> for String {
    fn from(key: AccountKey) -> Self {
        key.0
    }
}

impl AsRef<[u8]> for AccountKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The account key is empty.
    #[error("account key is empty")]
    Empty,

    /// The account key exceeds the maximum length.
    #[error("account key too long: {len} bytes (max {max})")]
    TooLong {
        /// Actual length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The account key contains a disallowed character.
    #[error("account key contains invalid characters")]
    InvalidCharacter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_key_roundtrip() {
        let key = AccountKey::new("acct-1").unwrap();
        let parsed: AccountKey = key.to_string().parse().unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn account_key_serde_json() {
        let key = AccountKey::new("org_42:tenant.7").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        let parsed: AccountKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn empty_key_rejected() {
        assert_eq!(AccountKey::new(""), Err(IdError::Empty));
    }

    #[test]
    fn overlong_key_rejected() {
        let key = "a".repeat(MAX_ACCOUNT_KEY_LEN + 1);
        assert!(matches!(
            AccountKey::new(key),
            Err(IdError::TooLong { .. })
        ));
    }

    #[test]
    fn invalid_characters_rejected() {
        assert_eq!(
            AccountKey::new("acct 1"),
            Err(IdError::InvalidCharacter)
        );
        assert_eq!(
            AccountKey::new("acct/1"),
            Err(IdError::InvalidCharacter)
        );
    }

    #[test]
    fn serde_rejects_invalid_key() {
        let result: Result<AccountKey, _> = serde_json::from_str("\"not valid!\"");
        assert!(result.is_err());
    }
}
