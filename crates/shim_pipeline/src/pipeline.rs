//! The composed resolve + map + build pipeline.

use std::sync::Arc;

use shim_cache::{BuildCache, BuildOutcome, BundleEngine};
use shim_common::{Logger, Severity};
use shim_compat::{CompatData, FeatureSupport, UserAgentParser};
use shim_config::{BundleConfig, ShimforgeConfig};
use shim_features::{FeatureReducer, FeatureSetRegistry, FeatureSpec};
use shim_target::ModuleMapper;

use crate::error::PipelineError;

/// Component name used when tagging log events.
pub(crate) const COMPONENT: &str = "shim_pipeline";

/// The external oracles the pipeline consults.
///
/// Held as shared trait objects so one backing implementation (such as
/// `MemoryCompat`, which implements all three) can serve every role.
#[derive(Clone)]
pub struct Oracles {
    /// The browser-compatibility database.
    pub compat: Arc<dyn CompatData>,
    /// The per-feature capability oracle.
    pub support: Arc<dyn FeatureSupport>,
    /// The user-agent parsing oracle.
    pub ua: Arc<dyn UserAgentParser>,
}

impl Oracles {
    /// Builds the oracle set from one implementation covering all three roles.
    pub fn from_single<T>(backend: Arc<T>) -> Self
    where
        T: CompatData + FeatureSupport + UserAgentParser + 'static,
    {
        Self {
            compat: backend.clone(),
            support: backend.clone(),
            ua: backend,
        }
    }
}

/// One polyfill build request.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Namespace prefixes to include.
    pub include: Vec<String>,
    /// Namespace prefixes to exclude.
    pub exclude: Vec<String>,
    /// The requesting client's user-agent string.
    pub ua_string: Option<String>,
    /// Explicit target query, bypassing user-agent resolution.
    pub override_target: Option<String>,
    /// Whether the bundle is minified; unset falls back to the
    /// configured bundle default.
    pub minify: Option<bool>,
}

/// The polyfill build pipeline.
///
/// Owns every piece of mutable state (registry, reducer memo, build
/// cache), so a multi-threaded host serializes access by wrapping the
/// whole `Pipeline` in a single lock.
pub struct Pipeline {
    registry: FeatureSetRegistry,
    reducer: FeatureReducer,
    mapper: ModuleMapper,
    cache: BuildCache,
    oracles: Oracles,
    bundle: BundleConfig,
}

impl Pipeline {
    /// Creates a pipeline from oracles, an engine, and a loaded configuration.
    ///
    /// The feature-set registry starts with the built-in `"default"` set
    /// plus every set the configuration declares. The reducer universe is
    /// taken from the compatibility database.
    pub fn new(oracles: Oracles, engine: Box<dyn BundleEngine>, config: &ShimforgeConfig) -> Self {
        let mut registry = FeatureSetRegistry::new();
        for (name, spec) in &config.feature_sets {
            registry.insert(name, spec.clone());
        }
        let reducer = FeatureReducer::new(oracles.compat.module_universe());
        let cache = BuildCache::new(engine, config.cache.max_size);

        Self {
            registry,
            reducer,
            mapper: ModuleMapper::new(),
            cache,
            oracles,
            bundle: config.bundle.clone(),
        }
    }

    /// Replaces the module mapper (e.g. to extend the supplemental check list).
    pub fn with_mapper(mut self, mapper: ModuleMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Generates the polyfill script for a request.
    ///
    /// Reduces the include/exclude pair to a feature universe, resolves
    /// the target and maps it to concrete modules, then hands the combined
    /// entry list to the build cache. Engine failures are logged at error
    /// level and surfaced; they are never cached.
    pub fn polyfill_script(
        &mut self,
        request: &BuildRequest,
        logger: &dyn Logger,
    ) -> Result<BuildOutcome, PipelineError> {
        let features = self.reducer.reduce(&request.include, &request.exclude);

        let mapped = self.mapper.map(
            self.oracles.compat.as_ref(),
            self.oracles.support.as_ref(),
            self.oracles.ua.as_ref(),
            &features,
            request.ua_string.as_deref(),
            request.override_target.as_deref(),
            logger,
        )?;

        let entry: Vec<String> = mapped
            .modules
            .iter()
            .map(|m| format!("{}{m}", self.bundle.module_root))
            .chain(mapped.supplemental.iter().cloned())
            .collect();

        let wrap = |script: &str| format!("!function (undefined) {{ 'use strict'; {script} }}();");
        let post: Option<shim_cache::PostProcess<'_>> =
            if self.bundle.wrap { Some(&wrap) } else { None };
        let minify = request.minify.unwrap_or(self.bundle.minify);

        match self.cache.build(&entry, minify, post) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                logger.log(
                    Severity::Error,
                    COMPONENT,
                    &format!("polyfill compile exception: \"{e}\""),
                );
                Err(e.into())
            }
        }
    }

    /// Generates the polyfill script for a registered feature set.
    ///
    /// Unknown names fall back to the `"default"` set (reported through
    /// the logger), matching the registry's lookup semantics.
    pub fn polyfill_for_set(
        &mut self,
        set_name: &str,
        ua_string: Option<&str>,
        override_target: Option<&str>,
        minify: Option<bool>,
        logger: &dyn Logger,
    ) -> Result<BuildOutcome, PipelineError> {
        let spec = self.registry.get(set_name, logger).clone();
        let request = BuildRequest {
            include: spec.include,
            exclude: spec.exclude,
            ua_string: ua_string.map(str::to_string),
            override_target: override_target.map(str::to_string),
            minify,
        };
        self.polyfill_script(&request, logger)
    }

    /// Registers (or overwrites) a feature set.
    pub fn register_feature_set(&mut self, name: &str, spec: FeatureSpec) {
        self.registry.insert(name, spec);
    }

    /// Removes every registered feature set, returning the count removed.
    pub fn clear_feature_sets(&mut self) -> usize {
        self.registry.clear()
    }

    /// Returns the feature-set registry for inspection.
    pub fn feature_sets(&self) -> &FeatureSetRegistry {
        &self.registry
    }

    /// Serializes the build cache into a restorable snapshot string.
    pub fn serialize_cache(&self) -> Result<String, PipelineError> {
        Ok(self.cache.serialize()?)
    }

    /// Replaces the build cache contents with a snapshot.
    pub fn restore_cache(&mut self, snapshot: &str) -> Result<(), PipelineError> {
        Ok(self.cache.restore(snapshot)?)
    }

    /// Empties the build cache, returning the prior entry count.
    pub fn clear_cache(&mut self) -> usize {
        self.cache.clear()
    }

    /// Returns all build-cache keys, most recently used first.
    pub fn cache_keys(&self) -> Vec<String> {
        self.cache.keys()
    }

    pub(crate) fn oracles(&self) -> &Oracles {
        &self.oracles
    }

    pub(crate) fn cache_len(&self) -> usize {
        self.cache.len()
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{fixture, StubEngine};
    use super::*;
    use shim_common::{MemoryLogger, NullLogger};
    use std::sync::atomic::Ordering;

    fn pipeline() -> (Pipeline, std::sync::Arc<std::sync::atomic::AtomicUsize>) {
        let (engine, calls) = StubEngine::new();
        let oracles = Oracles::from_single(Arc::new(fixture()));
        let pipeline = Pipeline::new(oracles, engine, &ShimforgeConfig::default());
        (pipeline, calls)
    }

    fn default_request(target: &str, minify: bool) -> BuildRequest {
        let spec = shim_features::default_feature_spec();
        BuildRequest {
            include: spec.include,
            exclude: spec.exclude,
            override_target: Some(target.to_string()),
            minify: Some(minify),
            ..Default::default()
        }
    }

    #[test]
    fn modern_target_produces_empty_script() {
        let (mut pipeline, calls) = pipeline();
        let out = pipeline
            .polyfill_script(&default_request("chrome 99", true), &NullLogger)
            .unwrap();
        assert_eq!(out.script, "");
        assert!(!out.cached);
        assert!(out.entry.is_empty());
        assert_eq!(calls.load(Ordering::Relaxed), 0, "nothing to compile");
    }

    #[test]
    fn legacy_target_produces_wrapped_script() {
        let (mut pipeline, _) = pipeline();
        let out = pipeline
            .polyfill_script(&default_request("ie 11", true), &NullLogger)
            .unwrap();
        assert!(!out.cached);
        assert!(out.script.starts_with("!function (undefined) { 'use strict'; "));
        assert!(out.script.ends_with(" }();"));
        // Database modules carry the module-root prefix, supplemental
        // modules come after unprefixed.
        assert_eq!(
            out.entry,
            vec![
                "core-js/modules/es.promise",
                "core-js/modules/es.symbol",
                "core-js/modules/es.string.pad-start",
                "core-js/modules/web.url-search-params",
                "whatwg-fetch",
                "intersection-observer",
            ]
        );
    }

    #[test]
    fn repeat_request_is_cached_with_identical_script() {
        let (mut pipeline, calls) = pipeline();
        let first = pipeline
            .polyfill_script(&default_request("ie 11", true), &NullLogger)
            .unwrap();
        let second = pipeline
            .polyfill_script(&default_request("ie 11", true), &NullLogger)
            .unwrap();
        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.script, second.script);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn ua_request_resolves_and_builds() {
        let (mut pipeline, _) = pipeline();
        let spec = shim_features::default_feature_spec();
        let request = BuildRequest {
            include: spec.include,
            exclude: spec.exclude,
            ua_string: Some("Mozilla/5.0 Chrome/49.0.2623.112".to_string()),
            minify: Some(false),
            ..Default::default()
        };
        let out = pipeline.polyfill_script(&request, &NullLogger).unwrap();
        // chrome 49 lacks es.promise, es.string.pad-start, and
        // IntersectionObserver but has fetch.
        assert_eq!(
            out.entry,
            vec![
                "core-js/modules/es.promise",
                "core-js/modules/es.string.pad-start",
                "intersection-observer",
            ]
        );
    }

    #[test]
    fn named_set_unknown_falls_back_to_default() {
        let (mut pipeline, _) = pipeline();
        let logger = MemoryLogger::new();
        let fallback = pipeline
            .polyfill_for_set("no-such-set", None, Some("ie 11"), Some(true), &logger)
            .unwrap();
        assert!(logger.has_errors(), "registry miss is reported");

        let direct = pipeline
            .polyfill_for_set("default", None, Some("ie 11"), Some(true), &NullLogger)
            .unwrap();
        assert_eq!(fallback.script, direct.script);
    }

    #[test]
    fn engine_failure_logged_and_surfaced() {
        struct BrokenEngine;
        impl shim_cache::BundleEngine for BrokenEngine {
            fn compile(
                &self,
                _: &[String],
                _: bool,
            ) -> Result<String, shim_cache::EngineError> {
                Err(shim_cache::EngineError::new("loader crashed"))
            }
        }

        let oracles = Oracles::from_single(Arc::new(fixture()));
        let mut pipeline =
            Pipeline::new(oracles, Box::new(BrokenEngine), &ShimforgeConfig::default());
        let logger = MemoryLogger::new();
        let err = pipeline
            .polyfill_script(&default_request("ie 11", true), &logger)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Build(_)));
        assert!(logger.has_errors());
        assert_eq!(pipeline.cache_keys().len(), 0, "failure not cached");
    }

    #[test]
    fn unwrapped_bundle_config_skips_closure() {
        let (engine, _) = StubEngine::new();
        let oracles = Oracles::from_single(Arc::new(fixture()));
        let mut config = ShimforgeConfig::default();
        config.bundle.wrap = false;
        let mut pipeline = Pipeline::new(oracles, engine, &config);
        let out = pipeline
            .polyfill_script(&default_request("ie 11", false), &NullLogger)
            .unwrap();
        assert!(out.script.starts_with("raw("));
    }

    #[test]
    fn config_feature_sets_are_registered() {
        let (engine, _) = StubEngine::new();
        let oracles = Oracles::from_single(Arc::new(fixture()));
        let config = shim_config::load_config_from_str(
            r#"
[feature_sets.promises-only]
include = ["es.promise"]
exclude = []
"#,
        )
        .unwrap();
        let mut pipeline = Pipeline::new(oracles, engine, &config);
        let out = pipeline
            .polyfill_for_set("promises-only", None, Some("ie 11"), Some(true), &NullLogger)
            .unwrap();
        assert_eq!(out.entry, vec![
            "core-js/modules/es.promise",
            "whatwg-fetch",
            "intersection-observer",
        ]);
    }

    #[test]
    fn unset_minify_falls_back_to_bundle_config() {
        let (engine, _) = StubEngine::new();
        let oracles = Oracles::from_single(Arc::new(fixture()));
        let mut config = ShimforgeConfig::default();
        config.bundle.minify = false;
        config.bundle.wrap = false;
        let mut pipeline = Pipeline::new(oracles, engine, &config);

        let spec = shim_features::default_feature_spec();
        let mut request = BuildRequest {
            include: spec.include,
            exclude: spec.exclude,
            override_target: Some("ie 11".to_string()),
            ..Default::default()
        };
        let out = pipeline.polyfill_script(&request, &NullLogger).unwrap();
        assert!(out.script.starts_with("raw("), "config default applies");

        // An explicit flag still overrides the configured default.
        request.minify = Some(true);
        let out = pipeline.polyfill_script(&request, &NullLogger).unwrap();
        assert!(out.script.starts_with("min("));
    }

    #[test]
    fn cache_snapshot_roundtrip_through_pipeline() {
        let (mut pipeline, _) = pipeline();
        pipeline
            .polyfill_script(&default_request("ie 11", true), &NullLogger)
            .unwrap();
        let snapshot = pipeline.serialize_cache().unwrap();

        let (fresh_engine, fresh_calls) = StubEngine::new();
        let oracles = Oracles::from_single(Arc::new(fixture()));
        let mut fresh = Pipeline::new(oracles, fresh_engine, &ShimforgeConfig::default());
        fresh.restore_cache(&snapshot).unwrap();

        let out = fresh
            .polyfill_script(&default_request("ie 11", true), &NullLogger)
            .unwrap();
        assert!(out.cached, "restored cache must serve the hit");
        assert_eq!(fresh_calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn clear_cache_reports_count() {
        let (mut pipeline, _) = pipeline();
        pipeline
            .polyfill_script(&default_request("ie 11", true), &NullLogger)
            .unwrap();
        assert_eq!(pipeline.clear_cache(), 1);
        assert_eq!(pipeline.clear_cache(), 0);
    }
}
