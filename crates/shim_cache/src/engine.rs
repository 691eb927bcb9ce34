//! The bundling/minification engine seam.

/// The external bundling and minification engine.
///
/// Treated as a black box: given an ordered entry-module list and a minify
/// flag, produce an executable script string or fail. Implementations wrap
/// whatever actually compiles the bundle; the cache layer never looks
/// inside the output.
pub trait BundleEngine {
    /// Compiles the entry modules into a single script.
    fn compile(&self, entry: &[String], minify: bool) -> Result<String, EngineError>;
}

/// A failure reported by the bundling engine.
///
/// Carries the engine-supplied message verbatim; build failures are never
/// cached and never retried by this layer.
#[derive(Debug, thiserror::Error)]
#[error("bundle compile failed: {message}")]
pub struct EngineError {
    /// The engine's own description of the failure.
    pub message: String,
}

impl EngineError {
    /// Creates an error from an engine-supplied message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_message() {
        let err = EngineError::new("entry module not found: es.promise");
        assert!(err.to_string().contains("entry module not found"));
    }
}
