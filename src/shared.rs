//! Shared Cache Module
//!
//! Thread-safe handle over a [`SplayCache`].
//!
//! Splaying rewrites the tree on every hit, so `get` is a write. The handle
//! therefore wraps the cache in a plain mutex rather than a reader/writer
//! lock, and each method holds it for one whole cache operation.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::cache::{CacheStats, SplayCache};
use crate::config::Config;
use crate::error::Result;

/// Cloneable handle to one cache shared across tasks.
#[derive(Debug)]
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<SplayCache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Ord + Hash + Clone,
{
    /// Wraps an existing cache.
    pub fn new(cache: SplayCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Builds an empty shared cache sized from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(SplayCache::new(config.capacity)?))
    }

    /// Locks the cache for a sequence of operations.
    ///
    /// References obtained through the guard (for example from `get`) cannot
    /// outlive it, so no other task can erase an entry while it is borrowed.
    pub async fn lock(&self) -> MutexGuard<'_, SplayCache<K, V>> {
        self.inner.lock().await
    }

    /// Looks up `key` and clones its value out.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().await.get(key).cloned()
    }

    /// Inserts or updates `key`; returns the evicted pair, if any.
    pub async fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().await.put(key, value)
    }

    /// Removes `key`, returning its value.
    pub async fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        self.inner.lock().await.remove(key)
    }

    // == Inspection ==
    /// Current number of entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Snapshot of the counters, taken under the lock.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }
}
