//! Payment-provider integration.
//!
//! The provider holds the external customer records; this service only ever
//! addresses it through opaque customer ids. The `CustomerProvider` trait is
//! the seam: the coordinator depends on it, `StripeProvider` implements it
//! over HTTP, and tests substitute mocks.

pub mod stripe;
pub mod types;

use async_trait::async_trait;

use provision_core::{AccountKey, ProvisionRequest};

pub use stripe::StripeProvider;

/// Errors from provider calls.
///
/// The split matters: the coordinator leaves the link `Pending` on
/// `Unavailable` (the attempt may be retried or reconciled) but marks it
/// `Failed` on `Rejected` (retrying the same input cannot succeed).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure, timeout, or a transient provider error (5xx/429).
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Transport or provider error detail.
        message: String,
    },

    /// The provider rejected the input (4xx). Terminal until input changes.
    #[error("provider rejected the request: {reason}")]
    Rejected {
        /// The provider's rejection reason.
        reason: String,
    },
}

/// A stateless client for the external payment provider.
///
/// Every call is a new network interaction; implementations hold no local
/// model of the provider's state.
#[async_trait]
pub trait CustomerProvider: Send + Sync {
    /// Create a customer record at the provider.
    ///
    /// Returns the provider's customer id.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Unavailable` for transient failures (retryable).
    /// - `ProviderError::Rejected` for validation failures (terminal).
    async fn create_customer(&self, request: &ProvisionRequest) -> Result<String, ProviderError>;

    /// Find an existing provider customer carrying this account key in its
    /// metadata.
    ///
    /// Used by the reconciliation sweep to adopt customers created by a
    /// crashed attempt instead of creating duplicates.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::create_customer`].
    async fn find_customer(&self, account_key: &AccountKey)
        -> Result<Option<String>, ProviderError>;
}
