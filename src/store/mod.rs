//! Store - Key-value persistence for named collections.
//!
//! A store maps string keys to JSON values. It knows nothing about
//! collections or records; it only serializes and deserializes. The
//! repository layer builds collections on top of it.
//!
//! ## Example
//!
//! ```ignore
//! use foundation_backend::store::{InMemoryStore, Store};
//! use serde_json::json;
//!
//! let store = InMemoryStore::new();
//! store.set("jivanjyoti_volunteers", &json!([]))?;
//! let value = store.get("jivanjyoti_volunteers")?;
//! ```

mod file;
mod in_memory;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use file::FileStore;
pub use in_memory::InMemoryStore;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A value could not be encoded or decoded.
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The backing medium failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The key cannot be represented by this store.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),
    /// An internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Abstract key-value storage.
///
/// Values are opaque to the store. There is no transactionality here;
/// callers that need read-modify-write atomicity serialize through the
/// repository's collection locks.
pub trait Store: Send + Sync {
    /// Load the value stored under `key`. Returns `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Remove `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// List every key currently held.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Size in bytes of the serialized value under `key`.
    fn raw_len(&self, key: &str) -> Result<Option<usize>, StoreError>;
}

impl<T: Store + ?Sized> Store for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }

    fn raw_len(&self, key: &str) -> Result<Option<usize>, StoreError> {
        (**self).raw_len(key)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }

    fn raw_len(&self, key: &str) -> Result<Option<usize>, StoreError> {
        (**self).raw_len(key)
    }
}
