//! In-memory storage implementation.
//!
//! Backs tests and ephemeral deployments with the same insert-if-absent
//! semantics as the persistent backend.

use std::collections::HashMap;
use std::sync::Mutex;

use provision_core::{AccountKey, CustomerLink};

use crate::error::{Result, StoreError};
use crate::IdentityStore;

/// Mutex-guarded map implementation of the identity store.
#[derive(Default)]
pub struct MemoryStore {
    links: Mutex<HashMap<AccountKey, CustomerLink>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<AccountKey, CustomerLink>>> {
        self.links
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".into()))
    }
}

impl IdentityStore for MemoryStore {
    fn find_by_account(&self, account_key: &AccountKey) -> Result<Option<CustomerLink>> {
        Ok(self.lock()?.get(account_key).cloned())
    }

    fn insert_pending(&self, account_key: &AccountKey) -> Result<CustomerLink> {
        let mut links = self.lock()?;

        if links.contains_key(account_key) {
            return Err(StoreError::Conflict {
                account_key: account_key.to_string(),
            });
        }

        let link = CustomerLink::pending(account_key.clone());
        links.insert(account_key.clone(), link.clone());
        Ok(link)
    }

    fn mark_confirmed(
        &self,
        account_key: &AccountKey,
        provider_customer_id: &str,
    ) -> Result<CustomerLink> {
        let mut links = self.lock()?;

        match links.get_mut(account_key) {
            Some(link) if link.is_pending() => {
                link.confirm(provider_customer_id);
                Ok(link.clone())
            }
            _ => Err(StoreError::NotFound {
                account_key: account_key.to_string(),
            }),
        }
    }

    fn mark_failed(&self, account_key: &AccountKey, reason: &str) -> Result<CustomerLink> {
        let mut links = self.lock()?;

        match links.get_mut(account_key) {
            Some(link) if link.is_pending() => {
                link.fail(reason);
                Ok(link.clone())
            }
            _ => Err(StoreError::NotFound {
                account_key: account_key.to_string(),
            }),
        }
    }
}
