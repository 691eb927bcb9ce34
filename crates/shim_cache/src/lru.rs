//! Bounded least-recently-used storage for compiled artifacts.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

/// A single cached build artifact.
///
/// Created on a cache miss after a successful compile and never mutated
/// afterwards; eviction or an explicit clear are the only ways out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The derived cache key this entry is stored under.
    pub key: String,
    /// The compiled (and possibly post-processed) script.
    pub script: String,
    /// The normalized entry-module list the script was built from.
    pub entry: Vec<String>,
}

/// Pluggable size heuristic for cache accounting.
pub type SizeFn = fn(&CacheEntry) -> usize;

/// The default size heuristic: the script's length in bytes.
///
/// Character count is a proxy for memory cost, not an exact measure; hosts
/// with different cost models supply their own function.
pub fn script_length(entry: &CacheEntry) -> usize {
    entry.script.len()
}

/// A size-bounded cache with least-recently-used eviction.
///
/// Recency is advanced by [`get`](Self::get) and [`insert`](Self::insert);
/// [`peek`](Self::peek) and [`contains`](Self::contains) do not touch it.
/// With no size bound the cache grows without eviction. An entry whose own
/// cost exceeds the bound is not stored at all.
pub struct LruCache {
    entries: HashMap<String, CacheEntry>,
    /// Keys ordered least-recently-used first.
    recency: VecDeque<String>,
    max_size: Option<usize>,
    size_fn: SizeFn,
    total_size: usize,
}

impl LruCache {
    /// Creates a cache with the given size bound (`None` = unbounded) and
    /// the default size heuristic.
    pub fn new(max_size: Option<usize>) -> Self {
        Self::with_size_fn(max_size, script_length)
    }

    /// Creates a cache with a custom size heuristic.
    pub fn with_size_fn(max_size: Option<usize>, size_fn: SizeFn) -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            max_size,
            size_fn,
            total_size: 0,
        }
    }

    /// Looks up an entry, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key)
    }

    /// Looks up an entry without advancing its recency.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if the key is present. Does not advance recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts an entry as most recently used, evicting least-recently-used
    /// entries until the cache fits its bound again.
    ///
    /// Re-inserting an existing key replaces the stored entry.
    pub fn insert(&mut self, entry: CacheEntry) {
        let cost = (self.size_fn)(&entry);
        if let Some(max) = self.max_size {
            if cost > max {
                return;
            }
        }

        self.remove(&entry.key);
        self.total_size += cost;
        self.recency.push_back(entry.key.clone());
        self.entries.insert(entry.key.clone(), entry);

        if let Some(max) = self.max_size {
            while self.total_size > max {
                let Some(oldest) = self.recency.front().cloned() else {
                    break;
                };
                self.remove(&oldest);
            }
        }
    }

    /// Removes an entry, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.total_size -= (self.size_fn)(&entry);
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            self.recency.remove(pos);
        }
        Some(entry)
    }

    /// Returns all keys, most recently used first.
    pub fn keys(&self) -> Vec<String> {
        self.recency.iter().rev().cloned().collect()
    }

    /// Dumps every live entry, most recently used first.
    ///
    /// [`load`](Self::load) accepts this exact ordering, so a dump/load
    /// round trip reproduces both contents and recency.
    pub fn dump(&self) -> Vec<CacheEntry> {
        self.recency
            .iter()
            .rev()
            .filter_map(|key| self.entries.get(key).cloned())
            .collect()
    }

    /// Replaces the cache contents with a previous dump, restoring the
    /// dump's recency order (first entry = most recent).
    pub fn load(&mut self, entries: Vec<CacheEntry>) {
        self.clear();
        for entry in entries.into_iter().rev() {
            self.insert(entry);
        }
    }

    /// Empties the cache, returning the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.recency.clear();
        self.total_size = 0;
        removed
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the accounted total size of all live entries.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Moves a key to the most-recently-used position.
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            self.recency.remove(pos);
            self.recency.push_back(key.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, script: &str) -> CacheEntry {
        CacheEntry {
            key: key.to_string(),
            script: script.to_string(),
            entry: vec![format!("{key}.js")],
        }
    }

    #[test]
    fn insert_and_get() {
        let mut cache = LruCache::new(None);
        cache.insert(entry("a", "aaaa"));
        assert_eq!(cache.get("a").unwrap().script, "aaaa");
        assert!(cache.get("b").is_none());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_size(), 4);
    }

    #[test]
    fn eviction_drops_least_recently_used() {
        let mut cache = LruCache::new(Some(8));
        cache.insert(entry("a", "aaaa"));
        cache.insert(entry("b", "bbbb"));
        cache.insert(entry("c", "cccc"));
        assert!(!cache.contains("a"), "a was least recently used");
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.total_size(), 8);
    }

    #[test]
    fn get_refreshes_recency() {
        let mut cache = LruCache::new(Some(8));
        cache.insert(entry("a", "aaaa"));
        cache.insert(entry("b", "bbbb"));
        cache.get("a");
        cache.insert(entry("c", "cccc"));
        assert!(cache.contains("a"), "a was refreshed by get");
        assert!(!cache.contains("b"));
    }

    #[test]
    fn peek_and_contains_do_not_refresh() {
        let mut cache = LruCache::new(Some(8));
        cache.insert(entry("a", "aaaa"));
        cache.insert(entry("b", "bbbb"));
        cache.peek("a");
        assert!(cache.contains("a"));
        cache.insert(entry("c", "cccc"));
        assert!(!cache.contains("a"), "peek must not advance recency");
    }

    #[test]
    fn oversized_entry_not_stored() {
        let mut cache = LruCache::new(Some(4));
        cache.insert(entry("big", "way too large"));
        assert!(cache.is_empty());
        assert_eq!(cache.total_size(), 0);
    }

    #[test]
    fn reinsert_replaces() {
        let mut cache = LruCache::new(None);
        cache.insert(entry("a", "old"));
        cache.insert(entry("a", "newer"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().script, "newer");
        assert_eq!(cache.total_size(), 5);
    }

    #[test]
    fn unbounded_never_evicts() {
        let mut cache = LruCache::new(None);
        for i in 0..100 {
            cache.insert(entry(&format!("k{i}"), "xxxxxxxxxx"));
        }
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn keys_most_recent_first() {
        let mut cache = LruCache::new(None);
        cache.insert(entry("a", "1"));
        cache.insert(entry("b", "2"));
        cache.insert(entry("c", "3"));
        cache.get("a");
        assert_eq!(cache.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn dump_load_roundtrip_preserves_recency() {
        let mut cache = LruCache::new(None);
        cache.insert(entry("a", "1"));
        cache.insert(entry("b", "2"));
        cache.insert(entry("c", "3"));
        cache.get("a");

        let dump = cache.dump();
        assert_eq!(dump[0].key, "a", "dump is most-recent-first");

        let mut restored = LruCache::new(None);
        restored.load(dump.clone());
        assert_eq!(restored.keys(), cache.keys());
        assert_eq!(restored.dump(), dump);
        assert_eq!(restored.total_size(), cache.total_size());
    }

    #[test]
    fn load_replaces_existing_contents() {
        let mut cache = LruCache::new(None);
        cache.insert(entry("old", "xxxx"));
        cache.load(vec![entry("new", "yyyy")]);
        assert!(!cache.contains("old"));
        assert!(cache.contains("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_returns_count() {
        let mut cache = LruCache::new(None);
        cache.insert(entry("a", "1"));
        cache.insert(entry("b", "2"));
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.total_size(), 0);
        assert_eq!(cache.clear(), 0);
    }

    #[test]
    fn custom_size_fn() {
        fn per_entry(_: &CacheEntry) -> usize {
            1
        }
        let mut cache = LruCache::with_size_fn(Some(2), per_entry);
        cache.insert(entry("a", "a very long script"));
        cache.insert(entry("b", "another long script"));
        cache.insert(entry("c", "third"));
        assert_eq!(cache.len(), 2, "bound counts entries, not bytes");
        assert!(!cache.contains("a"));
    }
}
