//! Error types for configuration loading.

use shim_features::FeatureError;

/// Errors raised while loading or validating `shimforge.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid TOML or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A declared feature set failed validation.
    #[error("invalid feature set in configuration: {0}")]
    FeatureSet(#[from] FeatureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ConfigError::ParseError("unexpected key".to_string());
        assert!(err.to_string().contains("unexpected key"));
    }

    #[test]
    fn feature_error_wrapped() {
        let err = ConfigError::from(FeatureError::IncompleteSpec {
            name: "checkout".to_string(),
            missing: "include",
        });
        assert!(err.to_string().contains("invalid feature set"));
        assert!(err.to_string().contains("checkout"));
    }
}
