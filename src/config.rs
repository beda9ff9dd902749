//! Configuration Module
//!
//! Construction-time cache configuration and the benchmark driver's
//! environment-based settings.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Strategy ==
/// Concurrency-control strategy selected when a cache is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// One exclusive lock around mapping, ledger and store access
    #[serde(rename = "coarse")]
    CoarseLock,
    /// Optimistic reads with permit-based admission
    #[default]
    #[serde(rename = "admission")]
    OptimisticAdmission,
    /// Admission plus per-key fetch coalescing
    #[serde(rename = "coalescing")]
    AdmissionWithCoalescing,
}

impl Strategy {
    /// Every available strategy, in benchmark order.
    pub const ALL: [Strategy; 3] = [
        Strategy::CoarseLock,
        Strategy::OptimisticAdmission,
        Strategy::AdmissionWithCoalescing,
    ];

    /// Short token used in env vars, logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CoarseLock => "coarse",
            Strategy::OptimisticAdmission => "admission",
            Strategy::AdmissionWithCoalescing => "coalescing",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" => Ok(Strategy::CoarseLock),
            "admission" => Ok(Strategy::OptimisticAdmission),
            "coalescing" => Ok(Strategy::AdmissionWithCoalescing),
            other => Err(CacheError::InvalidArgument(format!(
                "Unknown strategy: {}",
                other
            ))),
        }
    }
}

// == Cache Config ==
/// Parameters fixed at cache construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Hard cap on cached entries
    pub max_capacity: usize,
    /// Concurrency-control strategy
    #[serde(default)]
    pub strategy: Strategy,
}

impl CacheConfig {
    /// Creates a config with the given capacity and strategy.
    pub fn new(max_capacity: usize, strategy: Strategy) -> Self {
        Self {
            max_capacity,
            strategy,
        }
    }

    /// Rejects configurations no cache can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.max_capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "max_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 100,
            strategy: Strategy::default(),
        }
    }
}

// == Bench Config ==
/// Benchmark driver configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, Serialize)]
pub struct BenchConfig {
    /// Capacity of every cache under test
    pub cache_size: usize,
    /// Repetitions per strategy and mode
    pub runs: usize,
    /// Strategies to exercise
    pub strategies: Vec<Strategy>,
    /// Whether the backing store sleeps to mimic a remote store
    pub simulate_storage_delay: bool,
    /// Number of reads over the hot working set per run
    pub read_iterations: usize,
    /// Worker threads used for parallel phases
    pub workers: usize,
}

impl BenchConfig {
    /// Creates a new BenchConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Cache capacity (default: 100)
    /// - `BENCH_RUNS` - Runs per strategy and mode (default: 5)
    /// - `BENCH_STRATEGIES` - Comma separated strategies (default: all)
    /// - `SIMULATE_STORAGE_DELAY` - `true`/`1` to sleep in the store (default: false)
    /// - `BENCH_READ_ITERATIONS` - Reads per run (default: 100000)
    /// - `BENCH_WORKERS` - Parallel workers (default: available parallelism)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_size: env::var("CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.cache_size),
            runs: env::var("BENCH_RUNS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.runs),
            strategies: env::var("BENCH_STRATEGIES")
                .ok()
                .and_then(|v| parse_strategies(&v))
                .unwrap_or(defaults.strategies),
            simulate_storage_delay: env::var("SIMULATE_STORAGE_DELAY")
                .ok()
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.simulate_storage_delay),
            read_iterations: env::var("BENCH_READ_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.read_iterations),
            workers: env::var("BENCH_WORKERS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.workers),
        }
    }

    /// Cache configuration for one strategy under test.
    pub fn cache_config(&self, strategy: Strategy) -> CacheConfig {
        CacheConfig::new(self.cache_size, strategy)
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            cache_size: 100,
            runs: 5,
            strategies: Strategy::ALL.to_vec(),
            simulate_storage_delay: false,
            read_iterations: 100_000,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

/// Parses a comma separated strategy list; None if any token is unknown or the list is empty.
fn parse_strategies(raw: &str) -> Option<Vec<Strategy>> {
    let parsed: Option<Vec<Strategy>> = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Strategy>().ok())
        .collect();
    parsed.filter(|list| !list.is_empty())
}
