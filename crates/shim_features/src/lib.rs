//! Feature-set registration and reduction.
//!
//! A feature set is a named pair of include/exclude namespace lists that
//! describes which compatibility modules are candidates for a build. This
//! crate owns the registry of named sets and the memoized reducer that
//! turns an include/exclude pair into a concrete, universe-ordered module
//! list.

#![warn(missing_docs)]

mod error;
mod reduce;
mod registry;
mod spec;

pub use error::FeatureError;
pub use reduce::FeatureReducer;
pub use registry::{default_feature_spec, FeatureSetRegistry, DEFAULT_SET_NAME};
pub use spec::{FeatureSpec, FeatureSpecDraft};
