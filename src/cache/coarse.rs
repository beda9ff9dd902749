//! Coarse Lock Cache
//!
//! Baseline strategy: one mutex covers the mapping, the eviction ledger and
//! every call into the backing store. Strongly consistent and free of
//! duplicate fetches, but even cache hits are serialized.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::{
    validate_key, validate_value, Cache, CacheEntry, CacheStats, EvictionLedger, StatsRecorder,
};
use crate::config::Strategy;
use crate::error::{CacheError, Result};
use crate::store::SharedStore;

// == Coarse State ==
/// Everything the coarse lock protects besides the store itself.
#[derive(Debug)]
struct CoarseState {
    entries: HashMap<String, String>,
    ledger: EvictionLedger,
}

// == Coarse Lock Cache ==
/// Bounded cache serialized behind a single mutex.
#[derive(Debug)]
pub struct CoarseLockCache<S> {
    state: Mutex<CoarseState>,
    store: S,
    capacity: usize,
    stats: StatsRecorder,
}

impl<S: SharedStore> CoarseLockCache<S> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize, store: S) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "max_capacity must be positive".to_string(),
            ));
        }
        info!("Coarse lock cache initialized: capacity={}", capacity);
        Ok(Self {
            state: Mutex::new(CoarseState {
                entries: HashMap::with_capacity(capacity),
                ledger: EvictionLedger::with_capacity(capacity),
            }),
            store,
            capacity,
            stats: StatsRecorder::default(),
        })
    }

    /// Returns the wrapped backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // == Admit ==
    /// Inserts a fetched value, evicting the oldest admission if full.
    fn admit(&self, state: &mut CoarseState, key: &str, value: String) -> Result<()> {
        if state.entries.len() >= self.capacity {
            let victim = state.ledger.pop_victim().ok_or_else(|| {
                let detail = format!(
                    "Eviction ledger empty with {} of {} slots used",
                    state.entries.len(),
                    self.capacity
                );
                error!("{}", detail);
                CacheError::InvariantViolation(detail)
            })?;
            if state.entries.remove(&victim).is_none() {
                let detail = format!("Ledger victim {} missing from mapping", victim);
                error!("{}", detail);
                return Err(CacheError::InvariantViolation(detail));
            }
            self.stats.record_eviction();
            debug!("Evicted key={} to admit key={}", victim, key);
        }

        state.entries.insert(key.to_string(), value);
        state.ledger.admit(key.to_string());
        Ok(())
    }
}

impl<S: SharedStore> Cache for CoarseLockCache<S> {
    fn get(&self, key: &str) -> Result<String> {
        validate_key(key)?;

        let mut state = self.state.lock();
        if let Some(value) = state.entries.get(key) {
            self.stats.record_hit();
            return Ok(value.clone());
        }

        self.stats.record_miss();
        self.stats.record_store_read();
        let value = self.store.get(key).map_err(|e| {
            warn!("Store read failed for key={}: {}", key, e);
            CacheError::from(e)
        })?;

        self.admit(&mut state, key, value.clone())?;
        Ok(value)
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;
        validate_value(&value)?;

        let mut state = self.state.lock();
        self.stats.record_store_write();
        self.store.put(key, value.clone()).map_err(|e| {
            warn!("Store write failed for key={}: {}", key, e);
            CacheError::from(e)
        })?;

        if let Some(cached) = state.entries.get_mut(key) {
            *cached = value;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn contains(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    fn snapshot(&self) -> Vec<CacheEntry> {
        let state = self.state.lock();
        state
            .entries
            .iter()
            .map(|(k, v)| CacheEntry::new(k.clone(), v.clone()))
            .collect()
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len(), self.capacity)
    }

    fn strategy(&self) -> Strategy {
        Strategy::CoarseLock
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{FakeStore, MemoryStore, SynchronizedStore};

    fn fake_cache(capacity: usize) -> CoarseLockCache<SynchronizedStore<FakeStore>> {
        CoarseLockCache::new(capacity, SynchronizedStore::new(FakeStore::new())).unwrap()
    }

    #[test]
    fn test_coarse_miss_then_hit() {
        let cache = fake_cache(10);

        assert_eq!(cache.get("42").unwrap(), "fake-42");
        assert_eq!(cache.get("42").unwrap(), "fake-42");

        assert_eq!(cache.store().lock().reads(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_coarse_evicts_first_admitted() {
        let cache = fake_cache(2);

        cache.get("a").unwrap();
        cache.get("b").unwrap();
        cache.get("c").unwrap();

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_coarse_put_cold_key_not_admitted() {
        let cache = CoarseLockCache::new(4, SynchronizedStore::new(MemoryStore::new())).unwrap();

        cache.put("k", "v".to_string()).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.get("k").unwrap(), "v");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_coarse_put_replaces_cached_value() {
        let cache = CoarseLockCache::new(4, SynchronizedStore::new(MemoryStore::new())).unwrap();

        cache.put("k", "v1".to_string()).unwrap();
        cache.get("k").unwrap();
        cache.put("k", "v2".to_string()).unwrap();

        assert_eq!(cache.get("k").unwrap(), "v2");
        assert_eq!(cache.store().lock().reads(), 1);
    }

    #[test]
    fn test_coarse_store_error_leaves_cache_unchanged() {
        let cache = CoarseLockCache::new(4, SynchronizedStore::new(MemoryStore::new())).unwrap();

        let result = cache.get("missing");
        assert_eq!(
            result,
            Err(CacheError::BackingStore(StoreError::NotFound(
                "missing".to_string()
            )))
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_coarse_rejects_zero_capacity() {
        let result = CoarseLockCache::new(0, SynchronizedStore::new(FakeStore::new()));
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[test]
    fn test_coarse_empty_ledger_is_violation() {
        let cache = fake_cache(1);
        // fill the mapping without recording anything in the ledger
        cache
            .state
            .lock()
            .entries
            .insert("ghost".to_string(), "v".to_string());

        let result = cache.get("k");
        assert!(matches!(result, Err(CacheError::InvariantViolation(_))));
        assert!(result.unwrap_err().is_fatal());
    }

    #[test]
    fn test_coarse_missing_victim_is_violation() {
        let cache = fake_cache(1);
        cache.get("a").unwrap();
        {
            let mut state = cache.state.lock();
            state.entries.remove("a");
            state.entries.insert("ghost".to_string(), "v".to_string());
        }

        let result = cache.get("k");
        assert!(matches!(result, Err(CacheError::InvariantViolation(_))));
        assert!(!cache.contains("k"));
    }
}
