//! The build front-end: key derivation, engine invocation, memoization.

use std::time::Instant;

use shim_common::KeyHasher;

use crate::engine::BundleEngine;
use crate::error::BuildError;
use crate::lru::{CacheEntry, LruCache, SizeFn};

/// An optional transform applied to the raw engine output before caching,
/// e.g. wrapping the script in an isolating closure.
pub type PostProcess<'a> = &'a dyn Fn(&str) -> String;

/// The result of a [`BuildCache::build`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// The compiled script; empty when the module list was empty.
    pub script: String,
    /// The normalized entry-module list the key was derived from.
    pub entry: Vec<String>,
    /// `true` when the script came from the cache rather than the engine.
    pub cached: bool,
    /// Wall-clock time spent in this call.
    pub elapsed_ms: u64,
}

/// Memoizing front-end over the bundling engine.
///
/// Owns the only call site into the engine. Entry paths are normalized by
/// stripping the working-root prefix before hashing, so two processes
/// rooted at different absolute paths derive the same key for the same
/// logical modules. Failed builds are surfaced and never cached.
///
/// Concurrent misses for the same key are not coalesced: callers hold
/// `&mut self`, and a host sharing one cache across tasks accepts that two
/// simultaneous misses both compile and the second write wins.
pub struct BuildCache {
    cache: LruCache,
    engine: Box<dyn BundleEngine>,
    working_root: String,
}

impl BuildCache {
    /// Creates a build cache over an engine, bounded by `max_size`
    /// (`None` = unbounded), rooted at the current working directory.
    pub fn new(engine: Box<dyn BundleEngine>, max_size: Option<usize>) -> Self {
        let working_root = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Self {
            cache: LruCache::new(max_size),
            engine,
            working_root,
        }
    }

    /// Overrides the working-root prefix stripped during normalization.
    pub fn with_working_root(mut self, root: &str) -> Self {
        self.working_root = root.to_string();
        self
    }

    /// Replaces the size heuristic used for cache accounting.
    ///
    /// Only meaningful before any entries are stored.
    pub fn with_size_fn(mut self, max_size: Option<usize>, size_fn: SizeFn) -> Self {
        self.cache = LruCache::with_size_fn(max_size, size_fn);
        self
    }

    /// Builds (or recalls) the script for a module list.
    ///
    /// An empty module list short-circuits to an empty script without
    /// touching the cache or the engine. On a hit the stored script is
    /// returned as-is; `post_process` only runs on freshly compiled output.
    pub fn build(
        &mut self,
        modules: &[String],
        minify: bool,
        post_process: Option<PostProcess<'_>>,
    ) -> Result<BuildOutcome, BuildError> {
        let start = Instant::now();

        if modules.is_empty() {
            return Ok(BuildOutcome {
                script: String::new(),
                entry: Vec::new(),
                cached: false,
                elapsed_ms: elapsed_ms(start),
            });
        }

        let normalized: Vec<String> = modules
            .iter()
            .map(|m| m.strip_prefix(&self.working_root).unwrap_or(m).to_string())
            .collect();
        let key = derive_key(&normalized, minify);

        if let Some(hit) = self.cache.get(&key) {
            return Ok(BuildOutcome {
                script: hit.script.clone(),
                entry: hit.entry.clone(),
                cached: true,
                elapsed_ms: elapsed_ms(start),
            });
        }

        let raw = self.engine.compile(modules, minify)?;
        let script = match post_process {
            Some(transform) => transform(&raw),
            None => raw,
        };

        self.cache.insert(CacheEntry {
            key,
            script: script.clone(),
            entry: normalized.clone(),
        });

        Ok(BuildOutcome {
            script,
            entry: normalized,
            cached: false,
            elapsed_ms: elapsed_ms(start),
        })
    }

    /// Serializes every live entry, preserving recency order, into a
    /// restorable snapshot string.
    pub fn serialize(&self) -> Result<String, BuildError> {
        serde_json::to_string(&self.cache.dump()).map_err(|e| BuildError::Snapshot {
            reason: e.to_string(),
        })
    }

    /// Replaces the cache contents with a snapshot produced by
    /// [`serialize`](Self::serialize).
    pub fn restore(&mut self, snapshot: &str) -> Result<(), BuildError> {
        let entries: Vec<CacheEntry> =
            serde_json::from_str(snapshot).map_err(|e| BuildError::Snapshot {
                reason: e.to_string(),
            })?;
        self.cache.load(entries);
        Ok(())
    }

    /// Empties the cache, returning the prior entry count.
    pub fn clear(&mut self) -> usize {
        self.cache.clear()
    }

    /// Returns all cache keys, most recently used first.
    pub fn keys(&self) -> Vec<String> {
        self.cache.keys()
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Derives the deterministic cache key for a normalized entry list and
/// minify flag.
fn derive_key(normalized: &[String], minify: bool) -> String {
    let mut hasher = KeyHasher::new();
    hasher.write_seq(normalized);
    hasher.write_flag(minify);
    hasher.finish().to_string()
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
