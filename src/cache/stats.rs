//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! backing-store traffic.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time cache performance metrics.
///
/// Values are approximate while other threads are using the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that had to go to the backing store
    pub misses: u64,
    /// Number of entries evicted to make room
    pub evictions: u64,
    /// Number of backing-store reads issued
    pub store_reads: u64,
    /// Number of backing-store writes issued
    pub store_writes: u64,
    /// Number of reads that waited on another caller's in-flight fetch
    pub coalesced_waits: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Maximum number of entries the cache may hold
    pub capacity: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by every thread using a cache.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    store_reads: AtomicU64,
    store_writes: AtomicU64,
    coalesced_waits: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_store_read(&self) {
        self.store_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_store_write(&self) {
        self.store_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced_wait(&self) {
        self.coalesced_waits.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters into a [`CacheStats`].
    pub(crate) fn snapshot(&self, total_entries: usize, capacity: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            store_reads: self.store_reads.load(Ordering::Relaxed),
            store_writes: self.store_writes.load(Ordering::Relaxed),
            coalesced_waits: self.coalesced_waits.load(Ordering::Relaxed),
            total_entries,
            capacity,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();

        let stats = recorder.snapshot(1, 10);
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_snapshot_copies_counters() {
        let recorder = StatsRecorder::default();
        recorder.record_eviction();
        recorder.record_eviction();
        recorder.record_store_read();
        recorder.record_store_write();
        recorder.record_coalesced_wait();

        let stats = recorder.snapshot(42, 100);
        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.store_reads, 1);
        assert_eq!(stats.store_writes, 1);
        assert_eq!(stats.coalesced_waits, 1);
        assert_eq!(stats.total_entries, 42);
        assert_eq!(stats.capacity, 100);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = StatsRecorder::default().snapshot(0, 2);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["capacity"], 2);
        assert_eq!(json["hits"], 0);
    }
}
