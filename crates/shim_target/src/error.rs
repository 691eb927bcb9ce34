//! Error types for target resolution and module mapping.

use shim_compat::{SupportError, UaError};

/// Errors raised during target resolution.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The user-agent oracle could not parse the incoming string.
    #[error("user agent parsing failed: {0}")]
    UserAgent(#[from] UaError),

    /// Every candidate including the guaranteed fallback was rejected.
    ///
    /// The fallback target is resolvable by construction, so this variant
    /// indicates a broken compatibility database, not bad input.
    #[error("target resolution exhausted all candidates including the fallback")]
    Exhausted,
}

/// Errors raised while mapping features to modules.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Target resolution failed.
    #[error(transparent)]
    Target(#[from] TargetError),

    /// A supplemental capability check failed.
    ///
    /// Indicates a misconfigured check list (unknown feature name), so the
    /// oracle error is propagated unchanged rather than recovered.
    #[error(transparent)]
    Support(#[from] SupportError),
}
