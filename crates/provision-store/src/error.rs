//! Error types for the identity store.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A link already exists for the account key. This is the expected
    /// concurrency signal from the idempotency gate, not an incident.
    #[error("link already exists for account {account_key}")]
    Conflict {
        /// The contended account key.
        account_key: String,
    },

    /// No pending link exists for the account key.
    #[error("no pending link for account {account_key}")]
    NotFound {
        /// The account key.
        account_key: String,
    },

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
