use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use super::RepositoryError;

/// A binary lock that parks waiters on a condvar until released.
pub(crate) struct Lock {
    state: Mutex<bool>,
    wake: Condvar,
}

impl Lock {
    pub fn new() -> Self {
        Lock {
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    pub fn lock(&self) {
        let mut locked = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        while *locked {
            locked = self
                .wake
                .wait(locked)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *locked = true;
    }

    #[cfg(test)]
    pub fn try_lock(&self) -> bool {
        let mut locked = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *locked {
            false
        } else {
            *locked = true;
            true
        }
    }

    pub fn unlock(&self) {
        let mut locked = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *locked {
            *locked = false;
            self.wake.notify_one();
        }
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its collection lock when dropped, including on early return
/// or panic inside the critical section.
pub(crate) struct CollectionGuard {
    lock: Arc<Lock>,
}

impl Drop for CollectionGuard {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

/// One single-writer lock per collection name.
#[derive(Default)]
pub(crate) struct CollectionLocks {
    locks: Mutex<HashMap<String, Arc<Lock>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `collection` is free, then hold it until the guard drops.
    pub fn acquire(&self, collection: &str) -> Result<CollectionGuard, RepositoryError> {
        let lock = self.ensure_lock(collection)?;
        lock.lock();
        Ok(CollectionGuard { lock })
    }

    fn ensure_lock(&self, collection: &str) -> Result<Arc<Lock>, RepositoryError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("collection lock map"))?;
        Ok(locks
            .entry(collection.to_string())
            .or_insert_with(|| Arc::new(Lock::new()))
            .clone())
    }
}
