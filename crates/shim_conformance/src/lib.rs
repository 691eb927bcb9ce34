//! Conformance test helpers for the shimforge polyfill pipeline.
//!
//! Provides a shared browser-compatibility fixture, a counting stub
//! bundling engine, and a pipeline constructor so integration tests can
//! exercise the full resolve → map → build flow with realistic data.

#![warn(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shim_cache::{BundleEngine, EngineError};
use shim_compat::MemoryCompat;
use shim_config::ShimforgeConfig;
use shim_pipeline::{Oracles, Pipeline};

/// A stub bundling engine that joins entry paths into a pseudo-script and
/// counts how many times it was invoked.
///
/// The output encodes the minify flag (`min(...)` vs `raw(...)`) so tests
/// can assert that the flag partitions cache keys.
pub struct CountingEngine {
    calls: Arc<AtomicUsize>,
}

impl CountingEngine {
    /// Creates the engine and a handle to its invocation counter.
    pub fn new() -> (Box<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Self {
                calls: Arc::clone(&calls),
            }),
            calls,
        )
    }
}

impl BundleEngine for CountingEngine {
    fn compile(&self, entry: &[String], minify: bool) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let joined = entry.join(";");
        Ok(if minify {
            format!("min({joined})")
        } else {
            format!("raw({joined})")
        })
    }
}

/// Builds the shared browser fixture.
///
/// Three families with distinct vintages: a legacy `ie 11` that supports
/// nothing natively, mid-vintage `chrome 49` / `firefox 52` releases with
/// partial support, and modern releases that need no polyfills at all.
/// Module names cover the namespaces of the built-in `"default"` set.
pub fn browser_fixture() -> MemoryCompat {
    let mut db = MemoryCompat::new();
    db.add_family("chrome", &[(49, 0), (70, 0), (99, 0)]);
    db.add_family("firefox", &[(52, 0), (60, 5), (91, 0)]);
    db.add_family("ie", &[(11, 0)]);

    db.add_module("es.symbol", &[("chrome", (49, 0)), ("firefox", (55, 0))]);
    db.add_module(
        "es.array.from",
        &[("chrome", (51, 0)), ("firefox", (52, 0))],
    );
    db.add_module(
        "es.array.includes",
        &[("chrome", (53, 0)), ("firefox", (52, 0))],
    );
    db.add_module("es.map", &[("chrome", (49, 0)), ("firefox", (52, 0))]);
    db.add_module("es.promise", &[("chrome", (55, 0)), ("firefox", (53, 0))]);
    db.add_module(
        "es.promise.finally",
        &[("chrome", (63, 0)), ("firefox", (58, 0))],
    );
    db.add_module(
        "es.string.pad-start",
        &[("chrome", (57, 0)), ("firefox", (53, 0))],
    );
    db.add_module(
        "es.string.pad-end",
        &[("chrome", (57, 0)), ("firefox", (53, 0))],
    );
    db.add_module(
        "web.dom-collections.for-each",
        &[("chrome", (58, 0)), ("firefox", (55, 0))],
    );
    db.add_module(
        "web.queue-microtask",
        &[("chrome", (71, 0)), ("firefox", (69, 0))],
    );
    db.add_module(
        "web.url-search-params",
        &[("chrome", (49, 0)), ("firefox", (52, 0))],
    );

    db.add_feature("fetch", &[("chrome", (42, 0)), ("firefox", (52, 0))]);
    db.add_feature(
        "intersectionobserver",
        &[("chrome", (58, 0)), ("firefox", (55, 0))],
    );

    db.add_ua_token("Chrome/", "chrome");
    db.add_ua_token("Firefox/", "firefox");
    db.add_ua_token("MSIE ", "ie");
    db
}

/// Builds a pipeline over the shared fixture, default configuration, and a
/// counting stub engine.
pub fn make_pipeline() -> (Pipeline, Arc<AtomicUsize>) {
    make_pipeline_with_config(&ShimforgeConfig::default())
}

/// Builds a pipeline over the shared fixture with a custom configuration.
pub fn make_pipeline_with_config(config: &ShimforgeConfig) -> (Pipeline, Arc<AtomicUsize>) {
    let (engine, calls) = CountingEngine::new();
    let oracles = Oracles::from_single(Arc::new(browser_fixture()));
    (Pipeline::new(oracles, engine, config), calls)
}
