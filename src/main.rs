//! Recency Cache demo
//!
//! Walks the cache through the canonical eviction scenario, then replays a
//! synthetic workload and prints the resulting statistics as JSON.

use anyhow::{ensure, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recency_cache::models::StatsReport;
use recency_cache::{Config, LruCache};

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Run the two-entry eviction scenario
/// 4. Run the synthetic workload against a cache of the configured capacity
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recency_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recency Cache demo");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: capacity={}, workload_operations={}, workload_key_space={}",
        config.capacity, config.workload_operations, config.workload_key_space
    );

    run_eviction_scenario()?;
    run_workload(&config)?;

    info!("Demo complete");
    Ok(())
}

/// Capacity 2: touching key 1 before inserting key 3 makes key 2 the victim.
fn run_eviction_scenario() -> anyhow::Result<()> {
    let mut cache = LruCache::new(2)?;

    cache.put(1, "a");
    cache.put(2, "b");
    cache.get(&1);
    if let Some((key, value)) = cache.put(3, "c") {
        info!(key, value, "Evicted least recently used entry");
    }

    println!("{}", cache);
    println!("{}", serde_json::to_string_pretty(&cache.snapshot())?);

    ensure!(cache.get(&2).is_none(), "key 2 should have been evicted");
    ensure!(cache.get(&1) == Some(&"a"), "key 1 should still be cached");
    ensure!(cache.get(&3) == Some(&"c"), "key 3 should be cached");
    ensure!(cache.size() == 2, "cache should hold two entries");
    Ok(())
}

/// Read-through workload: misses load the key, every third operation writes.
fn run_workload(config: &Config) -> anyhow::Result<()> {
    let mut cache: LruCache<String, usize> = LruCache::new(config.capacity)?;

    for op in 0..config.workload_operations {
        let key = format!("key{}", workload_key(op, config.workload_key_space));
        if op % 3 == 0 || cache.get(&key).is_none() {
            cache.put(key, op);
        }
    }

    cache
        .check_invariants()
        .context("cache invariants broken after workload")?;

    let report = StatsReport::from(&cache.stats());
    info!(
        hit_rate = report.hit_rate,
        evictions = report.evictions,
        "Workload finished"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Skewed key choice: three quarters of operations hit an eighth of the keys.
fn workload_key(op: usize, key_space: usize) -> usize {
    let mixed = (op as u64)
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    let r = (mixed >> 33) as usize;
    if r % 4 == 0 {
        r % key_space
    } else {
        r % (key_space / 8).max(1)
    }
}
