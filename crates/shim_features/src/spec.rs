//! Feature-set specifications and their validation boundary.

use serde::Deserialize;

use crate::error::FeatureError;

/// A validated include/exclude pair describing a feature set.
///
/// Immutable once constructed. Two specs with equal lists reduce to the
/// identical module set, which is the basis for the reducer's memoization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    /// Namespace prefixes whose matching modules are candidates.
    pub include: Vec<String>,
    /// Namespace prefixes removed after all includes are applied.
    pub exclude: Vec<String>,
}

impl FeatureSpec {
    /// Creates a spec from complete include and exclude lists.
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    /// Validates a draft, rejecting one that is missing either list.
    ///
    /// This is the only fallible path into a `FeatureSpec`; a rejected
    /// draft leaves no trace anywhere (the registry only accepts
    /// already-validated specs).
    pub fn try_from_draft(name: &str, draft: FeatureSpecDraft) -> Result<Self, FeatureError> {
        let include = draft.include.ok_or(FeatureError::IncompleteSpec {
            name: name.to_string(),
            missing: "include",
        })?;
        let exclude = draft.exclude.ok_or(FeatureError::IncompleteSpec {
            name: name.to_string(),
            missing: "exclude",
        })?;
        Ok(Self { include, exclude })
    }
}

/// An unvalidated feature-set definition as it arrives from configuration.
///
/// Both lists are optional here so that a definition with a missing list
/// can be rejected with a descriptive error instead of being silently
/// defaulted to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureSpecDraft {
    /// Namespace prefixes to include, if present.
    pub include: Option<Vec<String>>,
    /// Namespace prefixes to exclude, if present.
    pub exclude: Option<Vec<String>>,
}
