//! Error types for feature-set handling.

/// Errors raised while validating or registering feature sets.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// A feature-set definition is missing its include or exclude list.
    ///
    /// Both lists are required even when empty; an absent list almost
    /// always means a typo in the host's configuration, so registration
    /// fails loudly instead of guessing.
    #[error("invalid feature set '{name}': missing {missing} list")]
    IncompleteSpec {
        /// The feature-set name being registered.
        name: String,
        /// Which list was absent (`"include"` or `"exclude"`).
        missing: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_spec_display() {
        let err = FeatureError::IncompleteSpec {
            name: "checkout".to_string(),
            missing: "exclude",
        };
        let msg = err.to_string();
        assert!(msg.contains("checkout"));
        assert!(msg.contains("missing exclude list"));
    }
}
