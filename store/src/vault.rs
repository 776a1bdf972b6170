//! Vault storage trait.

use crate::StoreError;
use silo_types::AccountId;

/// Store trait for persisting vault engine state to durable storage.
///
/// Payloads are opaque `Vec<u8>` so the store doesn't depend on the
/// engine crate (which would create a circular dependency). The engine
/// serializes/deserializes its own types.
pub trait VaultStore {
    fn put_position(&self, account: &AccountId, bytes: &[u8]) -> Result<(), StoreError>;
    fn delete_position(&self, account: &AccountId) -> Result<(), StoreError>;
    /// All persisted positions as (depositor, payload) pairs.
    fn iter_positions(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
