//! Memoization of compiled bundle artifacts.
//!
//! This crate owns the expensive half of the pipeline: it derives a stable
//! cache key from a normalized module list and a minify flag, invokes the
//! external bundling engine on misses, and keeps successful artifacts in a
//! bounded least-recently-used cache that can be serialized and restored
//! wholesale.

#![warn(missing_docs)]

mod build;
mod engine;
mod error;
mod lru;

pub use build::{BuildCache, BuildOutcome, PostProcess};
pub use engine::{BundleEngine, EngineError};
pub use error::BuildError;
pub use lru::{script_length, CacheEntry, LruCache, SizeFn};
