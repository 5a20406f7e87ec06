//! InMemoryStore - HashMap-backed store for testing and single-process use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{Store, StoreError};

/// In-memory store backed by a HashMap of serialized JSON strings.
///
/// Values round-trip through JSON text on every access, so callers never
/// share structure with what is stored. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        match storage.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        storage.insert(key.to_string(), raw);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("remove"))?;
        Ok(storage.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("keys"))?;
        Ok(storage.keys().cloned().collect())
    }

    fn raw_len(&self, key: &str) -> Result<Option<usize>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.get(key).map(|raw| raw.len()))
    }
}
