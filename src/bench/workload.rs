//! Workload
//!
//! 1. Write keys 100..1000 through the cache (cold keys, store only)
//! 2. Write keys 0..100 sequentially
//! 3. Read the hot working set 0..100 `read_iterations` times in total

use std::ops::Range;
use std::thread;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::cache::{BoundedCache, Cache, CacheStats};
use crate::config::{BenchConfig, Strategy};
use crate::error::Result;
use crate::store::{FakeStore, Latency, SynchronizedStore};

/// Keys written in the cold phase
const COLD_KEYS: Range<usize> = 100..1_000;

/// Keys forming the hot working set
const HOT_KEYS: Range<usize> = 0..100;

/// Cache type every benchmark run uses.
pub type BenchCache = BoundedCache<SynchronizedStore<FakeStore>>;

// == Run Report ==
/// Timings and counters of one workload run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub strategy: Strategy,
    pub parallel: bool,
    pub write_millis: u128,
    pub read_millis: u128,
    pub reads: usize,
    pub stats: CacheStats,
}

/// Builds a cache for `strategy` over a fresh, synchronized fake store.
pub fn build_cache(strategy: Strategy, config: &BenchConfig) -> Result<BenchCache> {
    let store = FakeStore::with_latency(Latency::simulated(config.simulate_storage_delay));
    BoundedCache::new(config.cache_config(strategy), SynchronizedStore::new(store))
}

/// Runs the workload once against `cache`.
///
/// With `parallel` set, the cold writes and the reads are spread across
/// `config.workers` threads. Any failed call aborts the run.
pub fn run_workload<C: Cache>(cache: &C, config: &BenchConfig, parallel: bool) -> Result<RunReport> {
    let workers = if parallel { config.workers.max(1) } else { 1 };

    let started = Instant::now();
    for_each_split(COLD_KEYS, workers, |i| {
        let key = i.to_string();
        cache.put(&key, key.clone())
    })?;
    let write_millis = started.elapsed().as_millis();

    for i in HOT_KEYS {
        let key = i.to_string();
        cache.put(&key, key.clone())?;
    }

    let hot = HOT_KEYS.len();
    let started = Instant::now();
    for_each_split(0..config.read_iterations, workers, |i| {
        cache.get(&(i % hot).to_string()).map(|_| ())
    })?;
    let read_millis = started.elapsed().as_millis();

    debug!(
        "Workload done: strategy={}, parallel={}, write={}ms, read={}ms",
        cache.strategy(),
        parallel,
        write_millis,
        read_millis
    );

    Ok(RunReport {
        strategy: cache.strategy(),
        parallel,
        write_millis,
        read_millis,
        reads: config.read_iterations,
        stats: cache.stats(),
    })
}

/// Calls `op` for every index of `range`, spread over `workers` scoped threads.
fn for_each_split<F>(range: Range<usize>, workers: usize, op: F) -> Result<()>
where
    F: Fn(usize) -> Result<()> + Sync,
{
    if workers <= 1 {
        return range.into_iter().try_for_each(&op);
    }

    let op = &op;
    thread::scope(|scope| {
        let handles: Vec<_> = split_range(range, workers)
            .into_iter()
            .map(|chunk| scope.spawn(move || chunk.into_iter().try_for_each(op)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect::<Result<Vec<()>>>()
            .map(|_| ())
    })
}

/// Splits `range` into at most `parts` contiguous, non-empty chunks.
pub fn split_range(range: Range<usize>, parts: usize) -> Vec<Range<usize>> {
    let len = range.len();
    if len == 0 || parts == 0 {
        return Vec::new();
    }
    let parts = parts.min(len);
    let base = len / parts;
    let extra = len % parts;

    let mut chunks = Vec::with_capacity(parts);
    let mut start = range.start;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        chunks.push(start..start + size);
        start += size;
    }
    chunks
}
