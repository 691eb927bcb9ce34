//! Mapping of a feature universe onto a resolved target.

use shim_common::Logger;
use shim_compat::{CompatData, FeatureSupport, UserAgentParser};

use crate::error::MapError;
use crate::resolve::{resolve_by_override, resolve_by_user_agent, Resolution};

/// One entry in the supplemental-capability check list.
///
/// If the resolved target lacks native support for `feature`, the polyfill
/// identified by `module` is appended to the build alongside the modules
/// derived from the compatibility database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementalCheck {
    /// Feature name understood by the support oracle.
    pub feature: String,
    /// Polyfill module identifier to append when unsupported.
    pub module: String,
}

impl SupplementalCheck {
    /// Creates a check entry.
    pub fn new(feature: &str, module: &str) -> Self {
        Self {
            feature: feature.to_string(),
            module: module.to_string(),
        }
    }
}

/// The default supplemental checks, in their fixed evaluation order.
///
/// The list has grown before and is expected to grow again, so it is data
/// held by the mapper rather than hard-coded logic.
pub fn default_supplemental_checks() -> Vec<SupplementalCheck> {
    vec![
        SupplementalCheck::new("fetch", "whatwg-fetch"),
        SupplementalCheck::new("intersectionobserver", "intersection-observer"),
    ]
}

/// The combined result of mapping a feature universe onto a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedModules {
    /// Compatibility modules the target needs, universe-ordered.
    pub modules: Vec<String>,
    /// Supplemental polyfill modules, in check-list order.
    pub supplemental: Vec<String>,
    /// The target query that resolution settled on.
    pub platform: String,
}

/// Maps a feature universe to the module lists a target needs.
///
/// Resolution goes through the override path when an override is given,
/// otherwise through the user-agent path. The mapper performs no caching
/// of its own; the build cache downstream is keyed on the final combined
/// module list.
#[derive(Debug, Clone)]
pub struct ModuleMapper {
    checks: Vec<SupplementalCheck>,
}

impl ModuleMapper {
    /// Creates a mapper with the default supplemental check list.
    pub fn new() -> Self {
        Self {
            checks: default_supplemental_checks(),
        }
    }

    /// Creates a mapper with a custom supplemental check list.
    ///
    /// Order is preserved and determines the order of appended modules.
    pub fn with_checks(checks: Vec<SupplementalCheck>) -> Self {
        Self { checks }
    }

    /// Returns the configured check list.
    pub fn checks(&self) -> &[SupplementalCheck] {
        &self.checks
    }

    /// Resolves a target and computes its module lists.
    ///
    /// Support-oracle failures indicate a bad check-list entry and are
    /// propagated unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn map(
        &self,
        db: &dyn CompatData,
        support: &dyn FeatureSupport,
        ua_parser: &dyn UserAgentParser,
        features: &[String],
        ua: Option<&str>,
        override_target: Option<&str>,
        logger: &dyn Logger,
    ) -> Result<MappedModules, MapError> {
        let Resolution { platform, modules } = match override_target {
            Some(target) => resolve_by_override(db, features, target, logger)?,
            None => {
                let ua = ua.unwrap_or_default();
                resolve_by_user_agent(db, ua_parser, features, ua, logger)?
            }
        };

        let mut supplemental = Vec::new();
        for check in &self.checks {
            if !support.is_supported(&platform, &check.feature)? {
                supplemental.push(check.module.clone());
            }
        }

        Ok(MappedModules {
            modules,
            supplemental,
            platform,
        })
    }
}

impl Default for ModuleMapper {
    fn default() -> Self {
        Self::new()
    }
}
