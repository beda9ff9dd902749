//! Synchronized Store
//!
//! Serializes every call into a non-thread-safe store.

use parking_lot::{Mutex, MutexGuard};

use crate::error::StoreResult;
use crate::store::{BackingStore, SharedStore};

// == Synchronized Store ==
/// Wraps a [`BackingStore`] in a mutex so it can be shared across threads.
///
/// Wrap a store once; every cache strategy can then be layered on top.
#[derive(Debug, Default)]
pub struct SynchronizedStore<S> {
    inner: Mutex<S>,
}

impl<S: BackingStore> SynchronizedStore<S> {
    /// Takes ownership of `store`.
    pub fn new(store: S) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Locks the wrapped store for inspection.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock()
    }

    /// Returns the wrapped store.
    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

impl<S: BackingStore> SharedStore for SynchronizedStore<S> {
    fn put(&self, key: &str, value: String) -> StoreResult<()> {
        self.inner.lock().put(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<String> {
        self.inner.lock().get(key)
    }
}
