//! Coalescing Cache
//!
//! Admission cache that merges concurrent misses for the same key into one
//! backing-store read. The first caller to miss registers an in-flight slot
//! and performs the fetch outside the mapping lock; callers arriving while
//! it runs block on that slot and share its outcome, errors included.
//!
//! A `put` retires any in-flight slot for its key. The retired leader still
//! hands its value to the callers already waiting on it but does not admit
//! it, and later misses start a fresh fetch that sees the new value.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::cache::{validate_key, validate_value, AdmissionCache, Cache, CacheEntry, CacheStats};
use crate::config::Strategy;
use crate::error::Result;
use crate::store::SharedStore;

// == Flight ==
/// One backing-store read, shared by every waiter.
#[derive(Debug, Default)]
struct Flight {
    outcome: OnceLock<Result<String>>,
    /// Set under the mapping lock by a `put` of the same key
    superseded: AtomicBool,
}

impl Flight {
    fn is_settled(&self) -> bool {
        self.outcome.get().is_some()
    }

    fn supersede(&self) {
        self.superseded.store(true, Ordering::Release);
    }

    fn is_superseded(&self) -> bool {
        self.superseded.load(Ordering::Acquire)
    }
}

// == Coalescing Cache ==
/// Bounded cache with at most one in-flight store read per key.
#[derive(Debug)]
pub struct CoalescingCache<S> {
    core: AdmissionCache<S>,
    in_flight: DashMap<String, Arc<Flight>>,
}

impl<S: SharedStore> CoalescingCache<S> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize, store: S) -> Result<Self> {
        Ok(Self {
            core: AdmissionCache::new(capacity, store)?,
            in_flight: DashMap::new(),
        })
    }

    /// Returns the wrapped backing store.
    pub fn store(&self) -> &S {
        self.core.store()
    }

    /// Number of keys with a store read in progress.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // == Join Flight ==
    /// Returns the pending flight for `key`, registering a new one if there is
    /// none or the registered one has already settled.
    fn join_flight(&self, key: &str) -> Arc<Flight> {
        match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(mut slot) if slot.get().is_settled() => {
                let fresh = Arc::new(Flight::default());
                slot.insert(Arc::clone(&fresh));
                fresh
            }
            Entry::Occupied(slot) => Arc::clone(slot.get()),
            Entry::Vacant(slot) => {
                let fresh = Arc::new(Flight::default());
                slot.insert(Arc::clone(&fresh));
                fresh
            }
        }
    }

    // == Resolve Miss ==
    /// Runs once per flight: fetch without the mapping lock, then admit
    /// unless a `put` of the same key landed meanwhile.
    fn resolve_miss(&self, key: &str, flight: &Flight) -> Result<String> {
        let stats = self.core.stats_recorder();
        {
            // a previous flight may have finished between our lookup and registration
            let guard = self.core.lock_exclusive();
            if let Some(value) = self.core.peek_locked(&guard, key) {
                stats.record_hit();
                return Ok(value);
            }
        }

        stats.record_miss();
        let value = self.core.fetch(key)?;

        let guard = self.core.lock_exclusive();
        if flight.is_superseded() {
            debug!("Put landed during fetch of key={}, not admitting", key);
            return Ok(value);
        }
        self.core.admit(&guard, key, value.clone())?;
        Ok(value)
    }
}

impl<S: SharedStore> Cache for CoalescingCache<S> {
    fn get(&self, key: &str) -> Result<String> {
        validate_key(key)?;

        if let Some(value) = self.core.cached(key) {
            return Ok(value);
        }

        let flight = self.join_flight(key);

        let mut leader = false;
        let outcome = flight
            .outcome
            .get_or_init(|| {
                leader = true;
                self.resolve_miss(key, &flight)
            })
            .clone();

        if leader {
            self.in_flight
                .remove_if(key, |_, registered| Arc::ptr_eq(registered, &flight));
        } else {
            self.core.stats_recorder().record_coalesced_wait();
            debug!("Joined in-flight fetch for key={}", key);
        }
        outcome
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;
        validate_value(&value)?;

        let guard = self.core.lock_exclusive();
        self.core.write_through_locked(&guard, key, value)?;
        if let Some((_, flight)) = self.in_flight.remove(key) {
            flight.supersede();
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.core.len()
    }

    fn capacity(&self) -> usize {
        self.core.capacity()
    }

    fn contains(&self, key: &str) -> bool {
        self.core.contains(key)
    }

    fn snapshot(&self) -> Vec<CacheEntry> {
        self.core.snapshot()
    }

    fn stats(&self) -> CacheStats {
        self.core.stats()
    }

    fn strategy(&self) -> Strategy {
        Strategy::AdmissionWithCoalescing
    }
}
