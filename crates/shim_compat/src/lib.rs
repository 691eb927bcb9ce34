//! External-collaborator seams for the shimforge pipeline.
//!
//! The pipeline needs three oracles it does not implement itself: a
//! browser-compatibility database, a per-feature support oracle, and a
//! user-agent parser. This crate defines them as traits so a host can plug
//! in real data sources, and ships [`MemoryCompat`], a table-driven
//! implementation of all three backed by declared release and support
//! tables.

#![warn(missing_docs)]

mod error;
mod memory;
mod query;

pub use error::{CompatError, SupportError, UaError};
pub use memory::MemoryCompat;
pub use query::TargetQuery;

/// A browser family and raw version string recovered from a user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserId {
    /// Lowercase family name as the compatibility database knows it.
    pub family: String,
    /// Raw version string, e.g. `"70.0.3538"`.
    pub version: String,
}

/// The browser-compatibility database.
///
/// Given a target query and a candidate module list, answers which modules
/// the target still needs. Queries with invalid syntax or an unrecognized
/// platform fail, which is what drives the target resolver's fallback chain.
pub trait CompatData {
    /// Returns every compatibility-module identifier the database knows,
    /// in its canonical order. This is the universe the feature reducer
    /// filters against.
    fn module_universe(&self) -> Vec<String>;

    /// Returns the subset of `filter` that `target_query` lacks native
    /// support for, preserving `filter` order.
    fn modules_for_target(
        &self,
        target_query: &str,
        filter: &[String],
    ) -> Result<Vec<String>, CompatError>;

    /// Lists every concrete target the database knows, for cache priming.
    ///
    /// `population_query` is the host's population filter (e.g. `"> 0%"`);
    /// implementations may honor or ignore it but must reject an empty query.
    fn known_targets(&self, population_query: &str) -> Result<Vec<String>, CompatError>;

    /// Returns the newest known major release for a browser family.
    ///
    /// Used to clamp user-agent versions newer than the database's data.
    fn latest_major(&self, family: &str) -> Result<u32, CompatError>;
}

/// The per-feature capability oracle.
pub trait FeatureSupport {
    /// Returns `true` if every browser matched by `target_query` natively
    /// supports `feature`.
    ///
    /// Fails for unknown feature names or unresolvable target queries;
    /// both indicate a misconfigured supplemental-check list, so callers
    /// propagate the error unchanged.
    fn is_supported(&self, target_query: &str, feature: &str) -> Result<bool, SupportError>;
}

/// The user-agent parsing oracle.
pub trait UserAgentParser {
    /// Extracts the browser family and version from a user-agent string.
    fn parse(&self, ua: &str) -> Result<BrowserId, UaError>;
}
