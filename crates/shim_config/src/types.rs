//! Configuration data types.

use std::collections::BTreeMap;

use serde::Deserialize;
use shim_features::{FeatureSpec, FeatureSpecDraft};

/// A fully loaded and validated configuration.
#[derive(Debug, Clone)]
pub struct ShimforgeConfig {
    /// Build-cache settings.
    pub cache: CacheConfig,
    /// Bundle assembly settings.
    pub bundle: BundleConfig,
    /// Host-defined feature sets, validated, keyed by name.
    pub feature_sets: BTreeMap<String, FeatureSpec>,
}

/// The raw on-disk shape before feature-set validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub feature_sets: BTreeMap<String, FeatureSpecDraft>,
}

/// Build-cache settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CacheConfig {
    /// Total size bound for cached scripts; omitted means unbounded.
    #[serde(default)]
    pub max_size: Option<usize>,
}

/// Bundle assembly settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleConfig {
    /// Path prefix prepended to compatibility-module identifiers to form
    /// engine entry paths.
    #[serde(default = "default_module_root")]
    pub module_root: String,

    /// Whether compiled scripts are wrapped in an isolating closure.
    #[serde(default = "default_wrap")]
    pub wrap: bool,

    /// Default minify flag for requests that do not specify one.
    #[serde(default = "default_minify")]
    pub minify: bool,
}

fn default_module_root() -> String {
    "core-js/modules/".to_string()
}

fn default_wrap() -> bool {
    true
}

fn default_minify() -> bool {
    true
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            module_root: default_module_root(),
            wrap: default_wrap(),
            minify: default_minify(),
        }
    }
}

impl Default for ShimforgeConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            bundle: BundleConfig::default(),
            feature_sets: BTreeMap::new(),
        }
    }
}
