//! Provisioning coordinator.
//!
//! Orchestrates "ensure a customer identity exists for account X". The store
//! provides the idempotency gate (insert-if-absent on the account key), the
//! provider performs the actual customer creation, and this module sequences
//! the two so that concurrent or repeated calls for the same account can
//! never create more than one provider customer.

use std::sync::Arc;

use provision_core::{AccountKey, LinkStatus, ProvisionError, ProvisionRequest};
use provision_store::{IdentityStore, StoreError};

use crate::provider::{CustomerProvider, ProviderError};

/// Orchestrates provisioning between the identity store and the provider.
///
/// Holds no state of its own and takes no lock across provider I/O; the
/// `Pending` row in the store is the concurrency token.
pub struct Coordinator {
    store: Arc<dyn IdentityStore>,
    provider: Arc<dyn CustomerProvider>,
}

impl Coordinator {
    /// Create a coordinator over the given store and provider.
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>, provider: Arc<dyn CustomerProvider>) -> Self {
        Self { store, provider }
    }

    /// Ensure a provider customer exists for the requesting account.
    ///
    /// Safe to call repeatedly and concurrently for the same account: at most
    /// one provider `create_customer` call is ever made per account key.
    ///
    /// # Errors
    ///
    /// See [`ProvisionError`] for the outcome taxonomy; only
    /// `ProvisionError::Storage` is unexpected.
    pub async fn ensure_customer(&self, request: &ProvisionRequest) -> Result<String, ProvisionError> {
        let account_key = &request.account_key;

        match self.store.insert_pending(account_key) {
            // This caller owns provisioning for the key.
            Ok(_) => self.provision_owned(request).await,
            Err(StoreError::Conflict { .. }) => self.resolve_existing(account_key),
            Err(e) => Err(storage_error(&e)),
        }
    }

    /// Reconcile a stuck `Pending` link.
    ///
    /// A provisioning attempt that crashed between the provider call and
    /// `mark_confirmed` leaves a `Pending` row and possibly an orphaned
    /// provider customer. The sweep first searches the provider for a
    /// customer carrying this account key and adopts it; only if none exists
    /// does it create one. Idempotent: re-running it converges on the same
    /// confirmed link.
    ///
    /// # Errors
    ///
    /// `ProvisionError::NotFound` if no link exists for the account; other
    /// outcomes as in [`Self::ensure_customer`].
    pub async fn reconcile(&self, request: &ProvisionRequest) -> Result<String, ProvisionError> {
        let account_key = &request.account_key;

        let link = self
            .store
            .find_by_account(account_key)
            .map_err(|e| storage_error(&e))?
            .ok_or_else(|| ProvisionError::NotFound {
                account_key: account_key.to_string(),
            })?;

        match link.status {
            LinkStatus::Confirmed => confirmed_id(account_key, link.provider_customer_id),
            LinkStatus::Failed => Err(ProvisionError::Failed {
                account_key: account_key.to_string(),
                reason: link.failure_reason.unwrap_or_default(),
            }),
            LinkStatus::Pending => match self.provider.find_customer(account_key).await {
                Ok(Some(id)) => {
                    self.store
                        .mark_confirmed(account_key, &id)
                        .map_err(|e| storage_error(&e))?;

                    tracing::info!(
                        account_key = %account_key,
                        provider_customer_id = %id,
                        "adopted existing provider customer during reconciliation"
                    );

                    Ok(id)
                }
                Ok(None) => self.provision_owned(request).await,
                Err(e) => Err(provider_error(e)),
            },
        }
    }

    /// Run the provider call for a key this caller owns (its link is
    /// `Pending`), then record the outcome.
    async fn provision_owned(&self, request: &ProvisionRequest) -> Result<String, ProvisionError> {
        let account_key = &request.account_key;

        match self.provider.create_customer(request).await {
            Ok(id) => {
                self.store
                    .mark_confirmed(account_key, &id)
                    .map_err(|e| storage_error(&e))?;

                tracing::info!(
                    account_key = %account_key,
                    provider_customer_id = %id,
                    "provider customer provisioned"
                );

                Ok(id)
            }
            Err(ProviderError::Rejected { reason }) => {
                self.store
                    .mark_failed(account_key, &reason)
                    .map_err(|e| storage_error(&e))?;

                tracing::warn!(
                    account_key = %account_key,
                    reason = %reason,
                    "provider rejected provisioning"
                );

                Err(ProvisionError::Rejected { reason })
            }
            Err(ProviderError::Unavailable { message }) => {
                // The link stays Pending; later calls fail fast until the
                // reconciliation sweep resolves it.
                tracing::warn!(
                    account_key = %account_key,
                    error = %message,
                    "provider unavailable, link left pending"
                );

                Err(ProvisionError::Unavailable { message })
            }
        }
    }

    /// Map an existing link (observed after an insert conflict) to the
    /// caller-facing outcome.
    fn resolve_existing(&self, account_key: &AccountKey) -> Result<String, ProvisionError> {
        let link = self
            .store
            .find_by_account(account_key)
            .map_err(|e| storage_error(&e))?;

        match link {
            Some(link) => match link.status {
                LinkStatus::Confirmed => confirmed_id(account_key, link.provider_customer_id),
                LinkStatus::Pending => Err(ProvisionError::InProgress {
                    account_key: account_key.to_string(),
                }),
                LinkStatus::Failed => Err(ProvisionError::Failed {
                    account_key: account_key.to_string(),
                    reason: link.failure_reason.unwrap_or_default(),
                }),
            },
            // The link vanished between the conflict and this read
            // (administrative deletion). Report in-progress rather than risk
            // a duplicate provider call; the caller retries.
            None => Err(ProvisionError::InProgress {
                account_key: account_key.to_string(),
            }),
        }
    }
}

/// Extract the id from a confirmed link, surfacing invariant violations as
/// storage errors.
fn confirmed_id(
    account_key: &AccountKey,
    provider_customer_id: Option<String>,
) -> Result<String, ProvisionError> {
    provider_customer_id.ok_or_else(|| {
        ProvisionError::Storage(format!(
            "confirmed link for {account_key} is missing its provider customer id"
        ))
    })
}

fn storage_error(e: &StoreError) -> ProvisionError {
    ProvisionError::Storage(e.to_string())
}

fn provider_error(e: ProviderError) -> ProvisionError {
    match e {
        ProviderError::Unavailable { message } => ProvisionError::Unavailable { message },
        ProviderError::Rejected { reason } => ProvisionError::Rejected { reason },
    }
}
