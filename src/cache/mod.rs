//! Cache Module
//!
//! Bounded, thread-safe caches in front of a slow backing store.
//!
//! Every strategy honours the same [`Cache`] contract:
//! - `get` serves hits from memory and admits misses, evicting when full
//! - `put` writes through to the store and refreshes an existing cached copy,
//!   but never admits a cold key
//! - occupancy never exceeds the configured capacity once calls quiesce
//!
//! Eviction is FIFO by admission time for every strategy.

mod admission;
mod coalescing;
mod coarse;
mod entry;
mod ledger;
mod permits;
mod stamp;
mod stats;


use std::fmt;

use crate::config::{CacheConfig, Strategy};
use crate::error::{CacheError, Result};
use crate::store::SharedStore;

// Re-export public types
pub use admission::AdmissionCache;
pub use coalescing::CoalescingCache;
pub use coarse::CoarseLockCache;
pub use entry::{compare_keys, CacheEntry};
pub use ledger::EvictionLedger;
pub use permits::PermitPool;
pub use stamp::{Stamp, StampWriteGuard};
pub use stats::CacheStats;

pub(crate) use stats::StatsRecorder;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Cache Contract ==
/// Operations shared by every cache strategy.
pub trait Cache: Send + Sync {
    /// Returns the cached value, fetching and admitting it on a miss.
    fn get(&self, key: &str) -> Result<String>;

    /// Writes through to the store; refreshes the cached copy if present.
    fn put(&self, key: &str, value: String) -> Result<()>;

    /// Number of cached entries. Approximate under concurrent mutation.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hard cap on cached entries.
    fn capacity(&self) -> usize;

    /// Whether `key` is cached right now. Never touches the store.
    fn contains(&self, key: &str) -> bool;

    /// Copies the cached entries, in no particular order.
    fn snapshot(&self) -> Vec<CacheEntry>;

    /// Counters plus current occupancy.
    fn stats(&self) -> CacheStats;

    fn strategy(&self) -> Strategy;

    /// Human-readable dump of the cached entries, ordered by key.
    fn dump(&self) -> String {
        entry::render(self.snapshot())
    }
}

// == Validation ==
/// Rejects keys the cache refuses to handle before any lock is taken.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument("Key must not be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidArgument(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Rejects oversized values. An empty value is allowed.
pub(crate) fn validate_value(value: &str) -> Result<()> {
    if value.len() > MAX_VALUE_SIZE {
        return Err(CacheError::InvalidArgument(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }
    Ok(())
}

// == Bounded Cache ==
/// A cache whose concurrency strategy is picked at construction.
#[derive(Debug)]
pub struct BoundedCache<S> {
    controller: Controller<S>,
}

#[derive(Debug)]
enum Controller<S> {
    Coarse(CoarseLockCache<S>),
    Admission(AdmissionCache<S>),
    Coalescing(CoalescingCache<S>),
}

impl<S: SharedStore> BoundedCache<S> {
    // == Constructor ==
    /// Builds the strategy named by `config` in front of `store`.
    pub fn new(config: CacheConfig, store: S) -> Result<Self> {
        config.validate()?;
        let controller = match config.strategy {
            Strategy::CoarseLock => {
                Controller::Coarse(CoarseLockCache::new(config.max_capacity, store)?)
            }
            Strategy::OptimisticAdmission => {
                Controller::Admission(AdmissionCache::new(config.max_capacity, store)?)
            }
            Strategy::AdmissionWithCoalescing => {
                Controller::Coalescing(CoalescingCache::new(config.max_capacity, store)?)
            }
        };
        Ok(Self { controller })
    }

    /// Returns the wrapped backing store.
    pub fn store(&self) -> &S {
        match &self.controller {
            Controller::Coarse(c) => c.store(),
            Controller::Admission(c) => c.store(),
            Controller::Coalescing(c) => c.store(),
        }
    }

    fn inner(&self) -> &dyn Cache {
        match &self.controller {
            Controller::Coarse(c) => c,
            Controller::Admission(c) => c,
            Controller::Coalescing(c) => c,
        }
    }
}

impl<S: SharedStore> Cache for BoundedCache<S> {
    fn get(&self, key: &str) -> Result<String> {
        self.inner().get(key)
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        self.inner().put(key, value)
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn capacity(&self) -> usize {
        self.inner().capacity()
    }

    fn contains(&self, key: &str) -> bool {
        self.inner().contains(key)
    }

    fn snapshot(&self) -> Vec<CacheEntry> {
        self.inner().snapshot()
    }

    fn stats(&self) -> CacheStats {
        self.inner().stats()
    }

    fn strategy(&self) -> Strategy {
        self.inner().strategy()
    }
}

impl<S: SharedStore> fmt::Display for BoundedCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
