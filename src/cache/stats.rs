//! Cache Statistics Module
//!
//! Counts lookups, writes and evictions performed by a [`super::SplayCache`].

use serde::Serialize;

// == Cache Stats ==
/// Counters describing cache activity.
///
/// Only `get` feeds hits and misses; `peek` and `contains` are invisible here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Puts that created a new entry
    pub inserts: u64,
    /// Puts that overwrote an existing entry
    pub updates: u64,
    /// Explicit removals of a present key
    pub removals: u64,
    /// Entries dropped to make room for a new key
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }

    // == Recording ==
    /// Counts a `get` that found its key.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a `get` that found nothing.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts a `put` that created a new entry.
    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    /// Counts a `put` that overwrote an existing value.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Counts a `remove` of a present key.
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Counts an entry dropped to make room.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Entry Count ==
    /// Mirrors the cache's current length.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
