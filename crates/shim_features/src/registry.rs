//! The registry of named feature sets.

use std::collections::BTreeMap;

use shim_common::{Logger, Severity};

use crate::spec::FeatureSpec;

/// Component name used when tagging log events.
const COMPONENT: &str = "shim_features";

/// Name of the built-in feature set every registry starts with.
pub const DEFAULT_SET_NAME: &str = "default";

/// The built-in `"default"` feature set.
///
/// Covers the stable ES namespaces plus the handful of `web.*` modules
/// that legacy browsers most commonly lack. Hosts wanting a different
/// baseline register their own set over the same name.
pub fn default_feature_spec() -> FeatureSpec {
    let include = [
        "es.symbol",
        "es.array",
        "es.date",
        "es.function",
        "es.json",
        "es.map",
        "es.number",
        "es.object",
        "es.promise",
        "es.regexp",
        "es.set",
        "es.string.code-point-at",
        "es.string.ends-with",
        "es.string.from-code-point",
        "es.string.includes",
        "es.string.iterator",
        "es.string.match",
        "es.string.match-all",
        "es.string.pad-end",
        "es.string.pad-start",
        "es.string.repeat",
        "es.string.replace",
        "es.string.search",
        "es.string.split",
        "es.string.starts-with",
        "es.string.trim",
        "es.string.trim-end",
        "es.string.trim-start",
        "web.dom-collections.for-each",
        "web.dom-collections.iterator",
        "web.queue-microtask",
        "web.url-search-params",
    ];
    FeatureSpec::new(
        include.iter().map(|s| s.to_string()).collect(),
        Vec::new(),
    )
}

/// Mapping from feature-set name to its validated specification.
///
/// An owned state object rather than a process global: the orchestrator
/// constructs one at startup and serializes mutation behind its own
/// exclusive borrow. Lookups of unknown names never fail; they log an
/// error-level event and fall back to the built-in default spec, so a
/// mistyped set name degrades the build instead of breaking it.
#[derive(Debug)]
pub struct FeatureSetRegistry {
    sets: BTreeMap<String, FeatureSpec>,
    fallback: FeatureSpec,
}

impl FeatureSetRegistry {
    /// Creates a registry seeded with the built-in `"default"` set.
    pub fn new() -> Self {
        let fallback = default_feature_spec();
        let mut sets = BTreeMap::new();
        sets.insert(DEFAULT_SET_NAME.to_string(), fallback.clone());
        Self { sets, fallback }
    }

    /// Registers a feature set, overwriting any existing set of that name.
    pub fn insert(&mut self, name: &str, spec: FeatureSpec) {
        self.sets.insert(name.to_string(), spec);
    }

    /// Looks up a feature set by name.
    ///
    /// An unknown name is reported as an error-level event and the
    /// built-in default spec is returned instead.
    pub fn get(&self, name: &str, logger: &dyn Logger) -> &FeatureSpec {
        match self.sets.get(name) {
            Some(spec) => spec,
            None => {
                logger.log(
                    Severity::Error,
                    COMPONENT,
                    &format!("no feature set \"{name}\" was found, falling back to \"{DEFAULT_SET_NAME}\""),
                );
                self.sets.get(DEFAULT_SET_NAME).unwrap_or(&self.fallback)
            }
        }
    }

    /// Returns every registered set, ordered by name.
    pub fn all(&self) -> &BTreeMap<String, FeatureSpec> {
        &self.sets
    }

    /// Removes every registered set, returning the count removed.
    ///
    /// Lookups on a cleared registry still fall back to the built-in
    /// default spec, so [`get`](Self::get) remains total.
    pub fn clear(&mut self) -> usize {
        let removed = self.sets.len();
        self.sets.clear();
        removed
    }
}

impl Default for FeatureSetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shim_common::{MemoryLogger, NullLogger};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn seeded_with_default() {
        let registry = FeatureSetRegistry::new();
        assert_eq!(registry.all().len(), 1);
        assert!(registry.all().contains_key(DEFAULT_SET_NAME));
    }

    #[test]
    fn insert_and_get() {
        let mut registry = FeatureSetRegistry::new();
        let spec = FeatureSpec::new(strings(&["es.map"]), vec![]);
        registry.insert("checkout", spec.clone());
        assert_eq!(*registry.get("checkout", &NullLogger), spec);
    }

    #[test]
    fn insert_overwrites() {
        let mut registry = FeatureSetRegistry::new();
        registry.insert("checkout", FeatureSpec::new(strings(&["es.map"]), vec![]));
        let replacement = FeatureSpec::new(strings(&["es.set"]), vec![]);
        registry.insert("checkout", replacement.clone());
        assert_eq!(*registry.get("checkout", &NullLogger), replacement);
        assert_eq!(registry.all().len(), 2);
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        let registry = FeatureSetRegistry::new();
        let logger = MemoryLogger::new();
        let spec = registry.get("no-such-set", &logger);
        assert_eq!(*spec, *registry.get(DEFAULT_SET_NAME, &NullLogger));

        let events = logger.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, shim_common::Severity::Error);
        assert!(events[0].message.contains("no-such-set"));
    }

    #[test]
    fn known_name_logs_nothing() {
        let registry = FeatureSetRegistry::new();
        let logger = MemoryLogger::new();
        registry.get(DEFAULT_SET_NAME, &logger);
        assert!(logger.events().is_empty());
    }

    #[test]
    fn clear_returns_count_removed() {
        let mut registry = FeatureSetRegistry::new();
        registry.insert("a", FeatureSpec::new(vec![], vec![]));
        registry.insert("b", FeatureSpec::new(vec![], vec![]));
        assert_eq!(registry.clear(), 3);
        assert!(registry.all().is_empty());
    }

    #[test]
    fn cleared_registry_still_resolves() {
        let mut registry = FeatureSetRegistry::new();
        registry.clear();
        let spec = registry.get("anything", &NullLogger);
        assert_eq!(*spec, default_feature_spec());
    }
}
