//! Target-platform resolution and module mapping.
//!
//! Converts a user-agent string or an explicit override into a validated
//! target platform via a deterministic fallback chain, then intersects a
//! feature universe against the compatibility database for that target and
//! appends supplemental polyfills driven by direct capability checks.

#![warn(missing_docs)]

mod error;
mod mapper;
mod resolve;

pub use error::{MapError, TargetError};
pub use mapper::{default_supplemental_checks, MappedModules, ModuleMapper, SupplementalCheck};
pub use resolve::{
    normalize_unreleased, resolve_by_override, resolve_by_user_agent, resolve_from_candidates,
    Resolution, FALLBACK_TARGET,
};
