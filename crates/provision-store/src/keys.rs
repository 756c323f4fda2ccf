//! Key encoding utilities for `RocksDB`.

use provision_core::AccountKey;

/// Create a link key from an account key.
///
/// Account keys are validated ASCII, so the raw bytes are directly usable
/// and sort lexicographically by account.
#[must_use]
pub fn link_key(account_key: &AccountKey) -> Vec<u8> {
    account_key.as_bytes().to_vec()
}
