//! Reduction of include/exclude namespace pairs into concrete module sets.

use std::collections::HashMap;
use std::sync::Arc;

use shim_common::{KeyHash, KeyHasher};

/// Memoized reducer from an include/exclude pair to a module set.
///
/// Constructed over the compatibility-module universe (canonical order).
/// Reduction adds every universe module matched by an include namespace,
/// then removes every module matched by an exclude namespace; excludes
/// always win. The output preserves universe order, never insertion order.
///
/// Results are memoized forever, keyed by a hash of the pair: distinct
/// pairs track configuration variety, not request volume, so the table
/// stays small and no eviction is needed. Repeat calls with a structurally
/// equal pair return the same shared allocation.
#[derive(Debug)]
pub struct FeatureReducer {
    universe: Vec<String>,
    memo: HashMap<KeyHash, Arc<[String]>>,
}

impl FeatureReducer {
    /// Creates a reducer over the given module universe.
    ///
    /// The universe's ordering is treated as canonical and is preserved
    /// in every reduction result.
    pub fn new(universe: Vec<String>) -> Self {
        Self {
            universe,
            memo: HashMap::new(),
        }
    }

    /// Reduces an include/exclude pair to its module set.
    ///
    /// Never fails: namespaces matching nothing simply contribute nothing.
    pub fn reduce(&mut self, include: &[String], exclude: &[String]) -> Arc<[String]> {
        let key = Self::memo_key(include, exclude);
        if let Some(cached) = self.memo.get(&key) {
            return Arc::clone(cached);
        }

        let mut selected = vec![false; self.universe.len()];
        Self::mark(&self.universe, include, &mut selected, true);
        Self::mark(&self.universe, exclude, &mut selected, false);

        let result: Arc<[String]> = self
            .universe
            .iter()
            .zip(&selected)
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| name.clone())
            .collect();
        self.memo.insert(key, Arc::clone(&result));
        result
    }

    /// Returns the number of distinct pairs reduced so far.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Flips the selection flag for every universe module matched by any
    /// namespace in `list`.
    fn mark(universe: &[String], list: &[String], selected: &mut [bool], value: bool) {
        for ns in list {
            for (idx, name) in universe.iter().enumerate() {
                if Self::matches(ns, name) {
                    selected[idx] = value;
                }
            }
        }
    }

    /// A module matches a namespace if it equals it or sits below it.
    fn matches(ns: &str, name: &str) -> bool {
        name == ns || (name.len() > ns.len() && name.starts_with(ns) && name.as_bytes()[ns.len()] == b'.')
    }

    fn memo_key(include: &[String], exclude: &[String]) -> KeyHash {
        let mut hasher = KeyHasher::new();
        hasher.write_seq(include);
        hasher.write_seq(exclude);
        hasher.finish()
    }
}
