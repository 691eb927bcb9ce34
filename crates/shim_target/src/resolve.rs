//! Candidate-chain target resolution.

use shim_common::{Logger, Severity};
use shim_compat::{CompatData, UserAgentParser};

use crate::error::TargetError;

/// Component name used when tagging log events.
const COMPONENT: &str = "shim_target";

/// The guaranteed-resolvable fallback target appended to every chain.
pub const FALLBACK_TARGET: &str = "defaults";

/// A successful resolution: the target query that the database accepted,
/// plus the modules it reported for the feature universe.
///
/// Resolution is recomputed per request; unlike feature reduction it is
/// never memoized, since the build cache downstream already collapses
/// repeated work on the final module list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The target query string that succeeded.
    pub platform: String,
    /// Modules from the feature universe that this target needs.
    pub modules: Vec<String>,
}

/// Attempts each candidate in order, most specific first, returning the
/// first one the compatibility database accepts.
///
/// The fallback target is always tried last, so the chain cannot be
/// exhausted by bad input: any candidate string, however malformed, just
/// produces a warning and a move to the next candidate. Reaching
/// [`TargetError::Exhausted`] means the fallback itself failed, which is
/// an internal error.
pub fn resolve_from_candidates(
    db: &dyn CompatData,
    features: &[String],
    candidates: &[String],
    ua: Option<&str>,
    logger: &dyn Logger,
) -> Result<Resolution, TargetError> {
    let fallback = FALLBACK_TARGET.to_string();
    for candidate in candidates.iter().chain(std::iter::once(&fallback)) {
        if candidate.as_str() == FALLBACK_TARGET {
            if let Some(ua) = ua {
                logger.log(
                    Severity::Warning,
                    COMPONENT,
                    &format!("using fallback query for userAgent=\"{ua}\""),
                );
            }
        }
        match db.modules_for_target(candidate, features) {
            Ok(modules) => {
                logger.log(
                    Severity::Info,
                    COMPONENT,
                    &format!(
                        "module mapping successful for userAgent=\"{}\" to targetPlatform=\"{candidate}\"",
                        ua.unwrap_or("")
                    ),
                );
                return Ok(Resolution {
                    platform: candidate.clone(),
                    modules,
                });
            }
            Err(e) => {
                logger.log(
                    Severity::Warning,
                    COMPONENT,
                    &format!(
                        "module mapping failed for userAgent=\"{}\" to targetPlatform=\"{candidate}\" (message: \"{e}\")",
                        ua.unwrap_or("")
                    ),
                );
            }
        }
    }
    Err(TargetError::Exhausted)
}

/// Resolves a target from a user-agent string.
///
/// Builds the candidate chain `family major.minor`, `family major`,
/// `family` (most specific first) from the parsed user agent, clamping the
/// major version to the newest release the database knows so that a
/// browser newer than the data does not fall all the way back to the
/// fallback target.
pub fn resolve_by_user_agent(
    db: &dyn CompatData,
    ua_parser: &dyn UserAgentParser,
    features: &[String],
    ua: &str,
    logger: &dyn Logger,
) -> Result<Resolution, TargetError> {
    let browser = ua_parser.parse(ua)?;
    let groups = numeric_groups(&browser.version);

    let mut candidates = Vec::with_capacity(3);
    if let Some(major) = groups.first() {
        let major = normalize_unreleased(db, &browser.family, major);
        if let Some(minor) = groups.get(1) {
            candidates.push(format!("{} {major}.{minor}", browser.family));
        }
        candidates.push(format!("{} {major}", browser.family));
    }
    candidates.push(browser.family.clone());

    resolve_from_candidates(db, features, &candidates, Some(ua), logger)
}

/// Resolves a target from an explicit override query.
///
/// The chain contains exactly the override (plus the implicit fallback).
pub fn resolve_by_override(
    db: &dyn CompatData,
    features: &[String],
    override_target: &str,
    logger: &dyn Logger,
) -> Result<Resolution, TargetError> {
    let candidates = vec![override_target.to_string()];
    resolve_from_candidates(db, features, &candidates, None, logger)
}

/// Clamps a major version to the newest release the database knows for a
/// family.
///
/// Prevents "version does not exist yet" rejections for browsers newer
/// than the compatibility data. If the family lookup fails or the major
/// is not numeric, the input passes through unchanged and the candidate
/// chain handles the failure.
pub fn normalize_unreleased(db: &dyn CompatData, family: &str, major: &str) -> String {
    let Ok(latest) = db.latest_major(family) else {
        return major.to_string();
    };
    match major.parse::<u32>() {
        Ok(requested) if requested > latest => latest.to_string(),
        _ => major.to_string(),
    }
}

/// Extracts the numeric groups of a version string, in order.
fn numeric_groups(version: &str) -> Vec<String> {
    version
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
