//! Splay Cache - A bounded key-value cache indexed by a splay tree
//!
//! Runs the interactive menu by default, or the concurrent writer demo
//! when started with the `demo` argument.

use anyhow::Context;
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use splay_cache::{menu::run_menu, spawn_demo_writers, Config, SharedCache};

/// Entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the shared cache
/// 4. Run the demo writers or the interactive menu
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "splay_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: capacity={}, demo_delay={}ms",
        config.capacity, config.demo_delay_ms
    );

    let cache: SharedCache<String, String> = SharedCache::from_config(&config)?;

    match std::env::args().nth(1).as_deref() {
        Some("demo") => run_demo(&cache, &config).await?,
        Some(other) => anyhow::bail!("unknown mode '{}', expected 'demo' or no argument", other),
        None => run_menu(&cache, BufReader::new(stdin()), stdout()).await?,
    }

    info!("Shutdown complete");
    Ok(())
}

/// Runs both demo writers to completion and prints the final contents.
async fn run_demo(cache: &SharedCache<String, String>, config: &Config) -> anyhow::Result<()> {
    for handle in spawn_demo_writers(cache.clone(), config.demo_delay()) {
        handle.await.context("demo writer panicked")?;
    }

    let guard = cache.lock().await;
    println!("Cache Contents:");
    for (key, value) in guard.iter() {
        println!("Key: {}, Value: {}", key, value);
    }
    println!();

    Ok(())
}
