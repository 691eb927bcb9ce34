//! The end-to-end polyfill build pipeline.
//!
//! Composes the feature registry and reducer, the target resolver and
//! module mapper, and the build cache into a single owned [`Pipeline`]
//! with two entry points: [`Pipeline::polyfill_script`] for serving one
//! request, and [`Pipeline::prime_cache`] for the warm-up sweep over every
//! registered feature set and known target.

#![warn(missing_docs)]

mod error;
mod pipeline;
mod prime;

pub use error::PipelineError;
pub use pipeline::{BuildRequest, Oracles, Pipeline};
