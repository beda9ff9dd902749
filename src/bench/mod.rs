//! Benchmark Harness Module
//!
//! Drives caches with the write-then-read workload used to compare
//! strategies. Lives outside the cache core and only uses its public API.

mod workload;

pub use workload::{build_cache, run_workload, split_range, BenchCache, RunReport};
