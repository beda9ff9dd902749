//! Stampede Bench - compares cache strategies under a parallel workload
//!
//! Runs every configured strategy `BENCH_RUNS` times in parallel and then
//! sequential mode, logging timings and printing a JSON summary.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stampede_cache::bench::{build_cache, run_workload, RunReport};
use stampede_cache::{BenchConfig, Strategy};

/// Everything printed at the end of a benchmark session.
#[derive(Debug, Serialize)]
struct Summary {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    config: BenchConfig,
    runs: Vec<RunReport>,
}

/// Main entry point for the cache benchmark.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. For each strategy and mode, build a fresh cache and run the workload
/// 4. Print the JSON summary to stdout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stampede_cache=info,stampede_bench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(BenchConfig::from_env());
    info!(
        "Configuration loaded: cache_size={}, runs={}, simulate_storage_delay={}, reads={}, workers={}",
        config.cache_size,
        config.runs,
        config.simulate_storage_delay,
        config.read_iterations,
        config.workers
    );

    let started_at = Utc::now();
    let mut runs = Vec::new();
    for &strategy in &config.strategies {
        for parallel in [true, false] {
            banner(strategy, parallel, &config);
            runs.extend(run_strategy(strategy, parallel, Arc::clone(&config)).await?);
        }
    }

    let summary = Summary {
        started_at,
        finished_at: Utc::now(),
        config: config.as_ref().clone(),
        runs,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
    );
    Ok(())
}

/// Runs the workload `config.runs` times against one cache on the blocking pool.
async fn run_strategy(
    strategy: Strategy,
    parallel: bool,
    config: Arc<BenchConfig>,
) -> anyhow::Result<Vec<RunReport>> {
    let cache = Arc::new(build_cache(strategy, &config)?);
    let mut reports = Vec::with_capacity(config.runs);

    for run in 0..config.runs {
        let cache = Arc::clone(&cache);
        let config = Arc::clone(&config);
        let report = tokio::task::spawn_blocking(move || run_workload(&*cache, &config, parallel))
            .await
            .context("Benchmark worker panicked")?
            .with_context(|| format!("Run {} of strategy {} failed", run, strategy))?;

        info!(
            "writeTime = {}ms, readTime = {}ms, hit_rate = {:.3}",
            report.write_millis,
            report.read_millis,
            report.stats.hit_rate()
        );
        if report.stats.total_entries > report.stats.capacity {
            warn!(
                "Occupancy {} above capacity {}",
                report.stats.total_entries, report.stats.capacity
            );
        }
        reports.push(report);
    }
    Ok(reports)
}

fn banner(strategy: Strategy, parallel: bool, config: &BenchConfig) {
    info!("=====================================================");
    info!("strategy = {}", strategy);
    info!("parallel = {}", parallel);
    info!("simulateStorageDelay = {}", config.simulate_storage_delay);
    info!("cacheSize = {}", config.cache_size);
    info!("-----------------------------------------------------");
}
