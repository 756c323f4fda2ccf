//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the
//! `IdentityStore` trait.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};

use provision_core::{AccountKey, CustomerLink};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::IdentityStore;

/// RocksDB-backed identity store.
///
/// `RocksDB` has no unique constraint of its own, so all link mutations go
/// through a store-level write lock: the check-then-write section of
/// `insert_pending` (and the precondition checks of `mark_confirmed` /
/// `mark_failed`) execute as a single critical section. The database is
/// embedded and owned by one process, so this realizes single-writer-wins
/// semantics for the account key. Reads take no lock.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read a link without taking the write lock.
    fn get_link(&self, account_key: &AccountKey) -> Result<Option<CustomerLink>> {
        let cf = self.cf(cf::LINKS)?;
        let key = keys::link_key(account_key);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Write a link record.
    fn put_link(&self, link: &CustomerLink) -> Result<()> {
        let cf = self.cf(cf::LINKS)?;
        let key = keys::link_key(&link.account_key);
        let value = Self::serialize(link)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Load the pending link for a key, holding the write lock at the caller.
    fn pending_link(&self, account_key: &AccountKey) -> Result<CustomerLink> {
        match self.get_link(account_key)? {
            Some(link) if link.is_pending() => Ok(link),
            _ => Err(StoreError::NotFound {
                account_key: account_key.to_string(),
            }),
        }
    }
}

impl IdentityStore for RocksStore {
    fn find_by_account(&self, account_key: &AccountKey) -> Result<Option<CustomerLink>> {
        self.get_link(account_key)
    }

    fn insert_pending(&self, account_key: &AccountKey) -> Result<CustomerLink> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))?;

        if self.get_link(account_key)?.is_some() {
            return Err(StoreError::Conflict {
                account_key: account_key.to_string(),
            });
        }

        let link = CustomerLink::pending(account_key.clone());
        self.put_link(&link)?;

        tracing::debug!(account_key = %account_key, "pending link inserted");

        Ok(link)
    }

    fn mark_confirmed(
        &self,
        account_key: &AccountKey,
        provider_customer_id: &str,
    ) -> Result<CustomerLink> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))?;

        let mut link = self.pending_link(account_key)?;
        link.confirm(provider_customer_id);
        self.put_link(&link)?;

        tracing::debug!(
            account_key = %account_key,
            provider_customer_id = %provider_customer_id,
            "link confirmed"
        );

        Ok(link)
    }

    fn mark_failed(&self, account_key: &AccountKey, reason: &str) -> Result<CustomerLink> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))?;

        let mut link = self.pending_link(account_key)?;
        link.fail(reason);
        self.put_link(&link)?;

        tracing::debug!(account_key = %account_key, reason = %reason, "link failed");

        Ok(link)
    }
}
