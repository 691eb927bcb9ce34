//! The cache-priming sweep.

use std::time::Instant;

use shim_common::{Logger, NullLogger, Severity};
use shim_target::FALLBACK_TARGET;

use crate::error::PipelineError;
use crate::pipeline::{BuildRequest, Pipeline, COMPONENT};

/// Population filter handed to the compatibility database when collecting
/// targets worth priming.
const POPULATION_QUERY: &str = "> 0%";

impl Pipeline {
    /// Pre-builds and caches artifacts for every (feature set, known
    /// target) combination, with minification forced on.
    ///
    /// Runs before the host serves live traffic so the expensive compiles
    /// happen up front. Inner builds use a no-op logger (per-candidate
    /// warnings for every known target are noise); the supplied logger
    /// gets per-feature-set timing and the growing cache size. Returns the
    /// final total entry count.
    pub fn prime_cache(&mut self, logger: &dyn Logger) -> Result<usize, PipelineError> {
        let mut targets = self.oracles().compat.known_targets(POPULATION_QUERY)?;
        targets.push(FALLBACK_TARGET.to_string());

        let sets: Vec<(String, shim_features::FeatureSpec)> = self
            .feature_sets()
            .all()
            .iter()
            .map(|(name, spec)| (name.clone(), spec.clone()))
            .collect();

        logger.log(
            Severity::Info,
            COMPONENT,
            &format!(
                "priming polyfill cache for feature sets: {:?}",
                sets.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>()
            ),
        );

        for (name, spec) in sets {
            let start = Instant::now();
            for target in &targets {
                let request = BuildRequest {
                    include: spec.include.clone(),
                    exclude: spec.exclude.clone(),
                    override_target: Some(target.clone()),
                    minify: Some(true),
                    ..Default::default()
                };
                self.polyfill_script(&request, &NullLogger)?;
            }
            logger.log(
                Severity::Info,
                COMPONENT,
                &format!(
                    "finished priming \"{name}\" in {}ms (cache now has {} entries)",
                    start.elapsed().as_millis(),
                    self.cache_len(),
                ),
            );
        }

        Ok(self.cache_len())
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::testutil::{fixture, StubEngine};
    use crate::pipeline::{Oracles, Pipeline};
    use shim_common::{MemoryLogger, NullLogger, Severity};
    use shim_config::ShimforgeConfig;
    use shim_features::FeatureSpec;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn pipeline() -> (Pipeline, std::sync::Arc<std::sync::atomic::AtomicUsize>) {
        let (engine, calls) = StubEngine::new();
        let oracles = Oracles::from_single(Arc::new(fixture()));
        (
            Pipeline::new(oracles, engine, &ShimforgeConfig::default()),
            calls,
        )
    }

    #[test]
    fn priming_populates_the_cache() {
        let (mut pipeline, _) = pipeline();
        let count = pipeline.prime_cache(&NullLogger).unwrap();
        assert!(count > 0);
        assert_eq!(pipeline.cache_keys().len(), count);
    }

    #[test]
    fn primed_cache_serves_live_requests() {
        let (mut pipeline, calls) = pipeline();
        pipeline.prime_cache(&NullLogger).unwrap();
        let compiles = calls.load(Ordering::Relaxed);

        let out = pipeline
            .polyfill_for_set("default", None, Some("ie 11"), Some(true), &NullLogger)
            .unwrap();
        assert!(out.cached, "live request after priming must hit the cache");
        assert_eq!(calls.load(Ordering::Relaxed), compiles);
    }

    #[test]
    fn priming_covers_every_registered_set() {
        let (mut pipeline, _) = pipeline();
        pipeline.register_feature_set(
            "promises-only",
            FeatureSpec::new(vec!["es.promise".to_string()], vec![]),
        );

        let logger = MemoryLogger::new();
        pipeline.prime_cache(&logger).unwrap();

        let messages: Vec<String> = logger
            .events()
            .into_iter()
            .filter(|e| e.severity == Severity::Info)
            .map(|e| e.message)
            .collect();
        assert!(messages.iter().any(|m| m.contains("\"default\"")));
        assert!(messages.iter().any(|m| m.contains("\"promises-only\"")));
    }

    #[test]
    fn repeated_priming_recompiles_nothing() {
        let (mut pipeline, calls) = pipeline();
        pipeline.prime_cache(&NullLogger).unwrap();
        let first_pass = calls.load(Ordering::Relaxed);

        let count = pipeline.prime_cache(&NullLogger).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), first_pass);
        assert_eq!(count, pipeline.cache_keys().len());
    }

    #[test]
    fn priming_reports_timing_and_size() {
        let (mut pipeline, _) = pipeline();
        let logger = MemoryLogger::new();
        pipeline.prime_cache(&logger).unwrap();
        assert!(logger
            .events()
            .iter()
            .any(|e| e.message.contains("cache now has")));
    }
}
