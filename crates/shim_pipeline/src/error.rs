//! Error types for the composed pipeline.

use shim_cache::BuildError;
use shim_compat::CompatError;
use shim_target::MapError;

/// Errors surfaced by pipeline operations.
///
/// Everything recoverable (rejected target candidates, unknown feature-set
/// names) is handled inside the components and reported through the
/// logger; what reaches this enum is genuinely the caller's problem.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Target resolution or a supplemental capability check failed.
    #[error(transparent)]
    Map(#[from] MapError),

    /// The bundling engine failed or a cache snapshot was invalid.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The compatibility database rejected a priming query.
    #[error(transparent)]
    Compat(#[from] CompatError),
}
