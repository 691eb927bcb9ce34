//! Configuration for a shimforge host (`shimforge.toml`).
//!
//! Declares the cache bound, bundle options, and any host-defined feature
//! sets. Feature-set definitions are validated at load time: one missing
//! an include or exclude list is rejected with a descriptive error rather
//! than silently defaulted.

#![warn(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{BundleConfig, CacheConfig, ShimforgeConfig};
