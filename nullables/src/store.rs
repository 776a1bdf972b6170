//! Nullable vault store — thread-safe in-memory storage for testing.

use silo_store::{StoreError, VaultStore};
use silo_types::AccountId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory vault store for testing.
pub struct NullVaultStore {
    positions: Mutex<HashMap<String, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl NullVaultStore {
    pub fn new() -> Self {
        Self {
            positions: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for NullVaultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultStore for NullVaultStore {
    fn put_position(&self, account: &AccountId, bytes: &[u8]) -> Result<(), StoreError> {
        self.positions
            .lock()
            .unwrap()
            .insert(account.as_str().to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete_position(&self, account: &AccountId) -> Result<(), StoreError> {
        self.positions.lock().unwrap().remove(account.as_str());
        Ok(())
    }

    fn iter_positions(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        Ok(self
            .positions
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (AccountId::new(k.clone()), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta.lock().unwrap().insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_round_trip() {
        let store = NullVaultStore::new();
        let alice = AccountId::new("alice");
        store.put_position(&alice, b"payload").unwrap();

        let all = store.iter_positions().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, alice);
        assert_eq!(all[0].1, b"payload");

        store.delete_position(&alice).unwrap();
        assert!(store.iter_positions().unwrap().is_empty());
    }

    #[test]
    fn meta_round_trip() {
        let store = NullVaultStore::new();
        assert!(store.get_meta(b"pool").unwrap().is_none());
        store.put_meta(b"pool", b"state").unwrap();
        assert_eq!(store.get_meta(b"pool").unwrap().unwrap(), b"state");
    }
}
