//! LRU TTL Cache demo
//!
//! Builds a shared cache from environment configuration, runs a short workload and
//! prints the resulting statistics as JSON.

use std::time::Duration as StdDuration;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl_cache::{Cache, Config, SharedCache};

/// Entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create a shared cache with the configured parameters
/// 4. Insert more entries than fit, some with short TTLs
/// 5. Read a few keys back, wait, then sweep expired entries
/// 6. Print statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, default_ttl={}s, sweep_interval={}s",
        config.capacity, config.default_ttl, config.sweep_interval
    );

    let cache: SharedCache<String, String> =
        SharedCache::new(Cache::from_config(&config).context("Failed to create cache")?);

    let total = config.capacity.saturating_add(config.capacity / 2);
    for i in 0..total {
        let ttl = if i % 3 == 0 {
            config.sweep_interval()
        } else {
            config.default_ttl()
        };
        cache.add(format!("key-{}", i), format!("value-{}", i), ttl).await;
    }
    info!("Inserted {} entries, {} retained", total, cache.len().await);

    for i in (0..total).step_by(7) {
        let key = format!("key-{}", i);
        match cache.get(&key).await {
            Some(value) => debug!("{} -> {}", key, value),
            None => debug!("{} missing", key),
        }
    }

    // Sweeping is the caller's job; wait out the short TTLs once and sweep
    tokio::time::sleep(StdDuration::from_secs(config.sweep_interval)).await;
    let removed = cache.clear_expired().await;
    info!("Sweep removed {} expired entries", removed);

    let stats = cache.stats().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?
    );
    info!("Hit rate: {:.2}", stats.hit_rate());

    Ok(())
}
