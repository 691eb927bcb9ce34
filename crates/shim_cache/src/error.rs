//! Error types for build-cache operations.

use crate::engine::EngineError;

/// Errors raised by [`BuildCache`](crate::BuildCache) operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The bundling engine rejected the build.
    ///
    /// Wrapped and re-surfaced to the caller; the failed build is never
    /// stored in the cache.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A cache snapshot could not be produced or parsed.
    #[error("cache snapshot error: {reason}")]
    Snapshot {
        /// Description of the serialization failure.
        reason: String,
    },
}
