//! Error types for provisioning operations.

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Outcomes of a provisioning call that are not plain success.
///
/// Everything except `Storage` is an expected control-flow outcome: callers
/// branch on these rather than treating them as incidents.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProvisionError {
    /// Another provisioning attempt for this account is in flight or was
    /// abandoned mid-flight. The caller may retry later; no provider call
    /// was made.
    #[error("provisioning in progress for account {account_key}")]
    InProgress {
        /// The contended account key.
        account_key: String,
    },

    /// A previous attempt for this account failed terminally. Requires an
    /// administrative reset before retrying.
    #[error("provisioning previously failed for account {account_key}: {reason}")]
    Failed {
        /// The account key.
        account_key: String,
        /// The stored failure reason.
        reason: String,
    },

    /// The provider rejected the input on this call. Terminal until the
    /// input changes.
    #[error("provider rejected the request: {reason}")]
    Rejected {
        /// The provider's rejection reason.
        reason: String,
    },

    /// The provider was unreachable or returned a transient error. The
    /// caller may retry with backoff.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Transport or provider error detail.
        message: String,
    },

    /// No link exists for the account.
    #[error("no customer link for account {account_key}")]
    NotFound {
        /// The account key.
        account_key: String,
    },

    /// The identity store failed unexpectedly. Fatal and alertable.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ProvisionError {
    /// Whether the caller may retry this outcome without changing the input.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InProgress { .. } | Self::Unavailable { .. })
    }
}
