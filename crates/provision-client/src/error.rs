//! Client error types.

/// Errors that can occur when using the provisioning client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Another provisioning attempt for the account is in flight.
    #[error("provisioning in progress")]
    InProgress,

    /// A previous provisioning attempt failed terminally.
    #[error("provisioning previously failed: {reason}")]
    ProvisioningFailed {
        /// The stored failure reason.
        reason: String,
    },

    /// The provider rejected the input.
    #[error("provider rejected the request: {reason}")]
    Rejected {
        /// The provider's rejection reason.
        reason: String,
    },

    /// The provider is unreachable; retry with backoff.
    #[error("provider unavailable")]
    Unavailable,

    /// No customer link exists for the account.
    #[error("customer link not found: {message}")]
    NotFound {
        /// Server-provided detail.
        message: String,
    },

    /// Server returned some other error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether retrying the same call later can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InProgress | Self::Unavailable | Self::Http(_))
    }
}
