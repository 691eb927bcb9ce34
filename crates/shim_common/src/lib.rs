//! Shared primitives for the shimforge build pipeline.
//!
//! This crate provides the deterministic key hashing used by the feature
//! reducer memo table and the build cache, plus the narrow logging
//! capability every other crate reports through.

#![warn(missing_docs)]

mod hash;
mod log;

pub use hash::{KeyHash, KeyHasher};
pub use log::{LogEvent, Logger, MemoryLogger, NullLogger, Severity};
