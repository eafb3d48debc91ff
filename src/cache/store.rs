//! Cache Store Module
//!
//! Main cache engine combining the splay tree index with a key map,
//! a capacity bound and recency-based eviction.
//!
//! Every method takes `&mut self` when it may splay, including [`SplayCache::get`].
//! There is no read-only lookup path that reorders recency, so sharing a cache
//! across threads needs one exclusive lock around each whole call
//! (see [`crate::SharedCache`]).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::cache::tree::{Iter, SplayTree};
use crate::cache::{CacheStats, NodeId, RecencyClock};
use crate::error::{CacheError, Result};

// == Splay Cache ==
/// Bounded key-value cache indexed by a splay tree.
#[derive(Debug)]
pub struct SplayCache<K, V> {
    /// Owns every entry
    tree: SplayTree<K, V>,
    /// Key -> arena slot, for O(1) membership
    index: HashMap<K, NodeId>,
    /// Source of recency stamps
    clock: RecencyClock,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> SplayCache<K, V>
where
    K: Ord + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty cache bounded at `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            tree: SplayTree::new(),
            index: HashMap::new(),
            clock: RecencyClock::new(),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// On a hit the entry's recency is refreshed and it is splayed to the
    /// root. On a miss the tree is left untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let tick = self.clock.tick();
        let root = self.tree.access(key);
        debug_assert_eq!(root, Some(id), "index and tree disagree");

        self.stats.record_hit();
        let node = self.tree.node_mut(id);
        node.touch(tick);
        Some(&node.value)
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// An existing key is updated in place. A new key arriving at capacity
    /// first evicts the least recently touched entry, which is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let tick = self.clock.tick();

        if self.index.contains_key(&key) {
            let (id, replaced) = self.tree.insert(key, value, tick);
            debug_assert!(replaced.is_some(), "indexed key missing from tree");
            self.stats.record_update();
            trace!(slot = id.index(), "updated entry in place");
            return None;
        }

        let evicted = if self.tree.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let (id, _) = self.tree.insert(key.clone(), value, tick);
        self.index.insert(key, id);
        self.stats.record_insert();
        self.stats.set_total_entries(self.tree.len());

        evicted
    }

    // == Remove ==
    /// Removes an entry by key, returning its value.
    ///
    /// Removing an absent key is a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        let (_, value) = self.detach(key)?;
        self.stats.record_removal();
        debug!(entries = self.tree.len(), "removed entry");
        Some(value)
    }

    // == Peek ==
    /// Looks a key up without splaying, refreshing recency or counting stats.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find(self.tree.root(), key)?;
        let node = self.tree.node(id);
        let stored: &Q = node.key.borrow();
        (stored == key).then_some(&node.value)
    }

    // == Contains ==
    /// O(1) membership test through the key map. Does not splay.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Unlinks `key` from the tree and the key map together.
    fn detach<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        self.index.remove(key)?;
        let pair = self.tree.erase(key);
        debug_assert!(pair.is_some(), "indexed key missing from tree");
        self.stats.set_total_entries(self.tree.len());
        pair
    }

    // == Evict ==
    /// Removes the entry with the oldest recency stamp.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let id = self.tree.least_recent()?;
        let victim = self.tree.node(id).key.clone();
        let pair = self.detach(&victim)?;
        self.stats.record_eviction();
        debug!(
            capacity = self.capacity,
            evictions = self.stats.evictions,
            "evicted least recently used entry"
        );
        Some(pair)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.tree.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Key currently at the root of the index.
    pub fn root_key(&self) -> Option<&K> {
        self.tree.root_key()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Drops every entry. Statistics other than the entry count are kept.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.index.clear();
        self.stats.set_total_entries(0);
    }

    /// Checks that the tree and key map agree and the tree is ordered.
    pub fn is_consistent(&self) -> bool {
        let ordered = self
            .tree
            .iter()
            .zip(self.tree.iter().skip(1))
            .all(|((a, _), (b, _))| a < b);

        let indexed = self
            .index
            .iter()
            .all(|(key, &id)| self.tree.try_node(id).is_some_and(|node| &node.key == key));

        ordered
            && indexed
            && self.index.len() == self.tree.len()
            && self.tree.iter().count() == self.tree.len()
            && self.tree.len() <= self.capacity
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> SplayCache<String, String> {
        SplayCache::new(capacity).unwrap()
    }

    fn put(cache: &mut SplayCache<String, String>, key: &str, value: &str) -> Option<(String, String)> {
        cache.put(key.to_string(), value.to_string())
    }

    #[test]
    fn test_store_new() {
        let store = cache(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.root_key(), None);
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let result = SplayCache::<String, String>::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = cache(100);

        put(&mut store, "key1", "value1");
        assert_eq!(store.get("key1").map(String::as_str), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = cache(100);
        put(&mut store, "key1", "value1");
        put(&mut store, "key2", "value2");
        let root = store.root_key().cloned();

        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.root_key().cloned(), root, "a miss must not restructure");
    }

    #[test]
    fn test_store_empty_value_is_not_absence() {
        let mut store = cache(4);
        put(&mut store, "blank", "");

        assert_eq!(store.get("blank").map(String::as_str), Some(""));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_store_get_splays_to_root() {
        let mut store = cache(10);
        for key in ["m", "c", "x", "a", "e"] {
            put(&mut store, key, key);
        }

        store.get("x");
        assert_eq!(store.root_key().map(String::as_str), Some("x"));
        store.get("a");
        assert_eq!(store.root_key().map(String::as_str), Some("a"));
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_remove() {
        let mut store = cache(100);

        put(&mut store, "key1", "value1");
        assert_eq!(store.remove("key1").as_deref(), Some("value1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_remove_nonexistent() {
        let mut store = cache(100);
        put(&mut store, "key1", "value1");

        assert_eq!(store.remove("nonexistent"), None);
        assert_eq!(store.len(), 1);
        assert!(store.contains("key1"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = cache(100);

        put(&mut store, "key1", "value1");
        assert_eq!(put(&mut store, "key1", "value2"), None);

        assert_eq!(store.get("key1").map(String::as_str), Some("value2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.root_key().map(String::as_str), Some("key1"));
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = cache(3);

        put(&mut store, "key1", "value1");
        put(&mut store, "key2", "value2");
        put(&mut store, "key3", "value3");

        // Cache is full, adding key4 should evict key1 (oldest)
        let evicted = put(&mut store, "key4", "value4");

        assert_eq!(evicted, Some(("key1".to_string(), "value1".to_string())));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = cache(3);

        put(&mut store, "a", "1");
        put(&mut store, "b", "2");
        put(&mut store, "c", "3");

        // Access a to make it most recently used
        store.get("a");

        // Adding d should evict b (now oldest)
        let evicted = put(&mut store, "d", "4");

        assert_eq!(evicted.map(|(k, _)| k).as_deref(), Some("b"));
        assert_eq!(store.get("b"), None);
        assert!(store.get("a").is_some());
        assert!(store.get("c").is_some());
        assert!(store.get("d").is_some());
    }

    #[test]
    fn test_store_update_refreshes_recency() {
        let mut store = cache(2);

        put(&mut store, "a", "1");
        put(&mut store, "b", "2");
        put(&mut store, "a", "1b");

        let evicted = put(&mut store, "c", "3");
        assert_eq!(evicted.map(|(k, _)| k).as_deref(), Some("b"));
        assert_eq!(store.peek("a").map(String::as_str), Some("1b"));
    }

    #[test]
    fn test_store_peek_does_not_touch() {
        let mut store = cache(2);

        put(&mut store, "a", "1");
        put(&mut store, "b", "2");
        let root = store.root_key().cloned();

        assert_eq!(store.peek("a").map(String::as_str), Some("1"));
        assert_eq!(store.peek("zzz"), None);
        assert_eq!(store.root_key().cloned(), root);

        // a was only peeked, so it is still the eviction victim
        let evicted = put(&mut store, "c", "3");
        assert_eq!(evicted.map(|(k, _)| k).as_deref(), Some("a"));
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_store_capacity_one() {
        let mut store = cache(1);

        put(&mut store, "a", "1");
        let evicted = put(&mut store, "b", "2");

        assert_eq!(evicted.map(|(k, _)| k).as_deref(), Some("a"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.root_key().map(String::as_str), Some("b"));
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_stats() {
        let mut store = cache(2);

        put(&mut store, "key1", "value1");
        store.get("key1"); // hit
        store.get("nonexistent"); // miss
        put(&mut store, "key2", "value2");
        put(&mut store, "key3", "value3"); // evicts

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.inserts, 3);
        assert_eq!(stats.updates, 0);
        assert_eq!(stats.total_entries, 2);
    }

    #[test]
    fn test_store_clear() {
        let mut store = cache(4);
        put(&mut store, "a", "1");
        put(&mut store, "b", "2");

        store.clear();

        assert!(store.is_empty());
        assert!(!store.contains("a"));
        assert_eq!(store.iter().count(), 0);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_iter_is_sorted() {
        let mut store = cache(10);
        for key in ["delta", "alpha", "echo", "charlie", "bravo"] {
            put(&mut store, key, &key.to_uppercase());
        }

        let keys: Vec<&str> = store.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "bravo", "charlie", "delta", "echo"]);
    }

    #[test]
    fn test_store_integer_keys() {
        let mut store: SplayCache<u32, Vec<u8>> = SplayCache::new(8).unwrap();
        for key in 0..20u32 {
            store.put(key, vec![key as u8]);
        }

        assert_eq!(store.len(), 8);
        assert_eq!(store.get(&19), Some(&vec![19u8]));
        assert_eq!(store.get(&0), None);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_reuses_slot_after_remove() {
        let mut store = cache(4);
        put(&mut store, "a", "1");
        put(&mut store, "b", "2");
        let freed = store.index["a"];

        store.remove("a");
        put(&mut store, "c", "3");

        assert_eq!(store.index["c"], freed);
        assert!(!store.index.contains_key("a"));
        assert_eq!(store.peek("a"), None);
        assert_eq!(store.get("c").map(String::as_str), Some("3"));
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_consistency_with_stale_index_entry() {
        let mut store = cache(4);
        put(&mut store, "a", "1");
        store.index.insert("ghost".to_string(), NodeId(99));

        assert!(!store.is_consistent());
    }

    #[test]
    fn test_store_consistency_after_tree_only_erase() {
        let mut store = cache(4);
        put(&mut store, "a", "1");
        put(&mut store, "b", "2");

        store.tree.erase("a");

        assert!(!store.is_consistent());
    }
}
