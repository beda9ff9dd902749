//! Optimistic Admission Cache
//!
//! Cache hits are served from a concurrent map, validated against a version
//! stamp and never block one another. Misses escalate to the mapping's
//! exclusive lock, read the store under a separate store lock and admit the
//! value through a permit pool and a FIFO eviction ledger.
//!
//! # Lock order
//! mapping lock -> store lock -> ledger mutex. The stamp write section is
//! only ever opened while the mapping's write lock is held.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

use crate::cache::{
    validate_key, validate_value, Cache, CacheEntry, CacheStats, EvictionLedger, PermitPool,
    Stamp, StatsRecorder,
};
use crate::config::Strategy;
use crate::error::{CacheError, Result};
use crate::store::SharedStore;

// == Admission Cache ==
/// Bounded cache with optimistic reads and permit-based admission.
#[derive(Debug)]
pub struct AdmissionCache<S> {
    /// Cached values
    map: DashMap<String, String>,
    /// Pessimistic/exclusive access to `map`
    lock: RwLock<()>,
    /// Detects writes racing an optimistic read
    stamp: Stamp,
    /// Free slots in `map`
    permits: PermitPool,
    /// Admission order of the keys in `map`
    ledger: Mutex<EvictionLedger>,
    /// Serializes store writes against store reads
    store_lock: RwLock<()>,
    store: S,
    stats: StatsRecorder,
}

impl<S: SharedStore> AdmissionCache<S> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize, store: S) -> Result<Self> {
        let permits = PermitPool::new(capacity)?;
        info!("Admission cache initialized: capacity={}", capacity);
        Ok(Self {
            map: DashMap::with_capacity(capacity),
            lock: RwLock::new(()),
            stamp: Stamp::new(),
            permits,
            ledger: Mutex::new(EvictionLedger::with_capacity(capacity)),
            store_lock: RwLock::new(()),
            store,
            stats: StatsRecorder::default(),
        })
    }

    /// Returns the wrapped backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Free permits right now.
    pub fn available_permits(&self) -> usize {
        self.permits.available()
    }

    // == Cached Lookup ==
    /// Tries the optimistic read, then a pessimistic read under the shared lock.
    ///
    /// Records a hit when a value is found.
    pub(crate) fn cached(&self, key: &str) -> Option<String> {
        if let Some(value) = self.optimistic_read(key) {
            self.stats.record_hit();
            return Some(value);
        }

        let _read = self.lock.read();
        let value = self.map.get(key).map(|entry| entry.value().clone());
        if value.is_some() {
            self.stats.record_hit();
        }
        value
    }

    /// Reads without taking the mapping lock; None on miss or failed validation.
    fn optimistic_read(&self, key: &str) -> Option<String> {
        let stamp = self.stamp.try_optimistic_read()?;
        let value = self.map.get(key).map(|entry| entry.value().clone());
        if self.stamp.validate(stamp) {
            value
        } else {
            None
        }
    }

    // == Fetch ==
    /// Reads `key` from the store under the shared store lock.
    pub(crate) fn fetch(&self, key: &str) -> Result<String> {
        let _store = self.store_lock.read();
        self.stats.record_store_read();
        self.store.get(key).map_err(|e| {
            warn!("Store read failed for key={}: {}", key, e);
            CacheError::from(e)
        })
    }

    // == Write Through ==
    /// Writes to the store first, then refreshes the cached copy if one exists.
    ///
    /// The mapping's exclusive lock is held throughout, so a miss that is
    /// fetching the same key either admits before the store write or sees it.
    pub(crate) fn write_through(&self, key: &str, value: String) -> Result<()> {
        let guard = self.lock.write();
        self.write_through_locked(&guard, key, value)
    }

    /// [`write_through`](Self::write_through) for callers already holding the exclusive lock.
    pub(crate) fn write_through_locked(
        &self,
        guard: &RwLockWriteGuard<'_, ()>,
        key: &str,
        value: String,
    ) -> Result<()> {
        {
            let _store = self.store_lock.write();
            self.stats.record_store_write();
            self.store.put(key, value.clone()).map_err(|e| {
                warn!("Store write failed for key={}: {}", key, e);
                CacheError::from(e)
            })?;
        }

        if self.map.contains_key(key) {
            let _section = self.stamp.write(guard);
            if let Some(mut cached) = self.map.get_mut(key) {
                *cached = value;
            }
        }
        Ok(())
    }

    /// Takes the mapping's exclusive lock.
    pub(crate) fn lock_exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write()
    }

    /// Looks `key` up while the exclusive lock is held.
    pub(crate) fn peek_locked(&self, _guard: &RwLockWriteGuard<'_, ()>, key: &str) -> Option<String> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn stats_recorder(&self) -> &StatsRecorder {
        &self.stats
    }

    // == Admit ==
    /// Inserts `key -> value` while enforcing the capacity bound.
    ///
    /// Takes a permit for a new key; if the key raced in already the permit
    /// goes straight back. When the pool is dry the oldest admission is
    /// evicted and its permit reused.
    pub(crate) fn admit(
        &self,
        guard: &RwLockWriteGuard<'_, ()>,
        key: &str,
        value: String,
    ) -> Result<()> {
        let _section = self.stamp.write(guard);
        loop {
            if self.permits.try_acquire() {
                if self.map.insert(key.to_string(), value).is_some() {
                    self.permits.release()?;
                } else {
                    self.ledger.lock().admit(key.to_string());
                }
                return Ok(());
            }

            let victim = self.ledger.lock().pop_victim().ok_or_else(|| {
                self.violation(format!(
                    "Eviction ledger empty while permit pool of {} is exhausted",
                    self.permits.capacity()
                ))
            })?;
            if self.map.remove(&victim).is_none() {
                return Err(self.violation(format!(
                    "Ledger victim {} missing from mapping",
                    victim
                )));
            }
            self.permits.release()?;
            self.stats.record_eviction();
            debug!("Evicted key={} to admit key={}", victim, key);
        }
    }

    fn violation(&self, detail: String) -> CacheError {
        error!("{}", detail);
        CacheError::InvariantViolation(detail)
    }
}

impl<S: SharedStore> Cache for AdmissionCache<S> {
    fn get(&self, key: &str) -> Result<String> {
        validate_key(key)?;

        if let Some(value) = self.cached(key) {
            return Ok(value);
        }

        let guard = self.lock.write();
        // another miss may have admitted the key while we waited
        if let Some(value) = self.peek_locked(&guard, key) {
            self.stats.record_hit();
            return Ok(value);
        }

        self.stats.record_miss();
        let value = self.fetch(key)?;
        self.admit(&guard, key, value.clone())?;
        Ok(value)
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;
        validate_value(&value)?;
        self.write_through(key, value)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.permits.capacity()
    }

    fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn snapshot(&self) -> Vec<CacheEntry> {
        self.map
            .iter()
            .map(|entry| CacheEntry::new(entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len(), self.capacity())
    }

    fn strategy(&self) -> Strategy {
        Strategy::OptimisticAdmission
    }
}
