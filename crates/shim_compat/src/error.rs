//! Error types for the compatibility oracles.

/// Errors produced by [`CompatData`](crate::CompatData) queries.
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    /// The target query does not follow the `family [major[.minor]]` grammar.
    #[error("malformed target query '{query}': {reason}")]
    Malformed {
        /// The offending query string.
        query: String,
        /// Description of the syntax problem.
        reason: String,
    },

    /// The browser family is not present in the database.
    #[error("unknown browser family '{family}'")]
    UnknownFamily {
        /// The unrecognized family name.
        family: String,
    },

    /// The family is known but the requested release is not.
    #[error("unknown version '{version}' for family '{family}'")]
    UnknownVersion {
        /// The browser family.
        family: String,
        /// The unrecognized version.
        version: String,
    },
}

/// Errors produced by [`FeatureSupport`](crate::FeatureSupport) lookups.
#[derive(Debug, thiserror::Error)]
pub enum SupportError {
    /// The feature name is not present in the support tables.
    #[error("unknown feature '{feature}'")]
    UnknownFeature {
        /// The unrecognized feature name.
        feature: String,
    },

    /// The target query could not be resolved.
    #[error("unresolvable target query: {0}")]
    Query(#[from] CompatError),
}

/// Errors produced by [`UserAgentParser`](crate::UserAgentParser).
#[derive(Debug, thiserror::Error)]
pub enum UaError {
    /// No registered pattern matched the user-agent string.
    #[error("unrecognized user agent '{ua}'")]
    Unrecognized {
        /// The user-agent string that failed to parse.
        ua: String,
    },
}
