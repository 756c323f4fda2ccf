//! Identity store for the customer provisioning service.
//!
//! This crate provides persistent storage for customer links: the durable
//! binding between an internal account key and an external payment-provider
//! customer id.
//!
//! # Architecture
//!
//! The storage uses a single `links` column family keyed by the account key
//! bytes. Uniqueness per account is enforced by `insert_pending`, which is
//! the idempotency gate for the whole provisioning flow: the first caller to
//! insert a pending link owns provisioning for that account, and every other
//! concurrent or later caller observes the existing link instead.
//!
//! # Example
//!
//! ```no_run
//! use provision_store::{IdentityStore, RocksStore};
//! use provision_core::AccountKey;
//!
//! let store = RocksStore::open("/tmp/provision-db").unwrap();
//!
//! let key = AccountKey::new("acct-1").unwrap();
//! let link = store.insert_pending(&key).unwrap();
//! assert!(link.is_pending());
//!
//! store.mark_confirmed(&key, "cus_123").unwrap();
//! let link = store.find_by_account(&key).unwrap().unwrap();
//! assert!(link.is_confirmed());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use rocks::RocksStore;

use provision_core::{AccountKey, CustomerLink};

/// The storage trait defining all identity-store operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (RocksDB for deployments, in-memory for tests). All
/// operations are atomic with respect to concurrent callers on the same
/// account key: at most one `insert_pending` can succeed per key, ever.
pub trait IdentityStore: Send + Sync {
    /// Look up the link for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_by_account(&self, account_key: &AccountKey) -> Result<Option<CustomerLink>>;

    /// Insert a new pending link for an account.
    ///
    /// This is the idempotency gate: it fails with `StoreError::Conflict` if
    /// a link of any status already exists for the key, so exactly one
    /// caller ever owns provisioning for an account.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if a link already exists for the key.
    /// - `StoreError::Database` if the operation fails.
    fn insert_pending(&self, account_key: &AccountKey) -> Result<CustomerLink>;

    /// Confirm the pending link for an account with its provider customer id.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no pending link exists for the key.
    /// - `StoreError::Database` if the operation fails.
    fn mark_confirmed(
        &self,
        account_key: &AccountKey,
        provider_customer_id: &str,
    ) -> Result<CustomerLink>;

    /// Mark the pending link for an account as terminally failed.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no pending link exists for the key.
    /// - `StoreError::Database` if the operation fails.
    fn mark_failed(&self, account_key: &AccountKey, reason: &str) -> Result<CustomerLink>;
}
