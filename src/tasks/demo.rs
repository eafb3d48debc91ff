//! Demo Writer Tasks
//!
//! Two tasks filling the same cache concurrently, each taking the lock
//! for one put at a time.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::shared::SharedCache;

/// Number of pairs the first writer inserts.
pub const DEMO_BATCH: usize = 3;

/// Spawns the two demo writers and returns their handles.
///
/// - The batch writer puts `key0..key2 -> value0..value2`, sleeping
///   `delay` after each put while the lock is released.
/// - The single writer puts `key3 -> value3` once.
///
/// # Example
/// ```ignore
/// let cache = SharedCache::new(SplayCache::new(4)?);
/// for handle in spawn_demo_writers(cache.clone(), Duration::from_millis(500)) {
///     handle.await?;
/// }
/// ```
pub fn spawn_demo_writers(
    cache: SharedCache<String, String>,
    delay: Duration,
) -> Vec<JoinHandle<()>> {
    let batch_cache = cache.clone();
    let batch = tokio::spawn(async move {
        info!("Batch writer started, inserting {} pairs", DEMO_BATCH);

        for i in 0..DEMO_BATCH {
            let key = format!("key{}", i);
            let evicted = batch_cache.put(key.clone(), format!("value{}", i)).await;
            if evicted.is_some() {
                debug!(%key, "batch writer evicted an entry");
            }

            tokio::time::sleep(delay).await;
        }

        info!("Batch writer finished");
    });

    let single = tokio::spawn(async move {
        let key = format!("key{}", DEMO_BATCH);
        let value = format!("value{}", DEMO_BATCH);
        cache.put(key, value).await;
        info!("Single writer finished");
    });

    vec![batch, single]
}
