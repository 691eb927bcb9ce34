//! Configuration file loading and validation.

use std::collections::BTreeMap;
use std::path::Path;

use shim_features::FeatureSpec;

use crate::error::ConfigError;
use crate::types::{RawConfig, ShimforgeConfig};

/// Name of the configuration file within a host directory.
const CONFIG_FILE: &str = "shimforge.toml";

/// Loads and validates a `shimforge.toml` from a host directory.
pub fn load_config(host_dir: &Path) -> Result<ShimforgeConfig, ConfigError> {
    let config_path = host_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ShimforgeConfig, ConfigError> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let mut feature_sets = BTreeMap::new();
    for (name, draft) in raw.feature_sets {
        let spec = FeatureSpec::try_from_draft(&name, draft)?;
        feature_sets.insert(name, spec);
    }

    Ok(ShimforgeConfig {
        cache: raw.cache,
        bundle: raw.bundle,
        feature_sets,
    })
}
