//! Table-driven in-memory implementation of the compatibility oracles.
//!
//! `MemoryCompat` is the reference backend: hosts declare browser release
//! lists, per-module native-support versions, and per-feature support
//! versions, and the struct answers all three oracle traits from those
//! tables. It is also the fixture every integration test builds on.

use std::collections::BTreeMap;

use crate::query::TargetQuery;
use crate::{
    BrowserId, CompatData, CompatError, FeatureSupport, SupportError, UaError, UserAgentParser,
};

/// A concrete browser release as `(major, minor)`.
type Release = (u32, u32);

/// In-memory compatibility database, feature-support oracle, and
/// user-agent parser.
///
/// All answers derive from three declared tables:
///
/// - **families**: sorted release lists per browser family;
/// - **modules**: for each compatibility module, the release at which each
///   family gained native support (absent family = never native);
/// - **features**: the same shape for supplemental capability checks.
///
/// The `"defaults"` query resolves to every family at its oldest declared
/// release, which makes it the most conservative target: a module is
/// reported as needed if any family's baseline needs it.
#[derive(Debug, Default)]
pub struct MemoryCompat {
    families: BTreeMap<String, Vec<Release>>,
    modules: Vec<(String, BTreeMap<String, Release>)>,
    features: BTreeMap<String, BTreeMap<String, Release>>,
    ua_tokens: Vec<(String, String)>,
}

impl MemoryCompat {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a browser family with its known releases.
    ///
    /// Releases are kept sorted; re-declaring a family replaces its list.
    pub fn add_family(&mut self, family: &str, releases: &[Release]) {
        let mut sorted = releases.to_vec();
        sorted.sort_unstable();
        self.families.insert(family.to_ascii_lowercase(), sorted);
    }

    /// Declares a compatibility module and the release at which each family
    /// gained native support.
    ///
    /// Declaration order defines the canonical module ordering reported by
    /// [`module_universe`](CompatData::module_universe).
    pub fn add_module(&mut self, name: &str, native_since: &[(&str, Release)]) {
        let table = native_since
            .iter()
            .map(|(family, release)| (family.to_ascii_lowercase(), *release))
            .collect();
        self.modules.push((name.to_string(), table));
    }

    /// Declares a supplemental capability and the release at which each
    /// family gained native support for it.
    pub fn add_feature(&mut self, name: &str, supported_since: &[(&str, Release)]) {
        let table = supported_since
            .iter()
            .map(|(family, release)| (family.to_ascii_lowercase(), *release))
            .collect();
        self.features.insert(name.to_string(), table);
    }

    /// Registers a user-agent token mapping, e.g. `"Chrome/"` → `"chrome"`.
    ///
    /// On parse, the version is read as the run of digits and dots
    /// immediately after the token. Tokens are tried in registration order,
    /// so register more specific tokens (e.g. `"Edg/"`) before generic ones.
    pub fn add_ua_token(&mut self, token: &str, family: &str) {
        self.ua_tokens
            .push((token.to_string(), family.to_ascii_lowercase()));
    }

    /// Resolves a query to the concrete `(family, release)` pairs it covers.
    fn resolve(&self, raw: &str) -> Result<Vec<(String, Release)>, CompatError> {
        match TargetQuery::parse(raw)? {
            TargetQuery::Defaults => Ok(self
                .families
                .iter()
                .filter_map(|(family, releases)| {
                    releases.first().map(|r| (family.clone(), *r))
                })
                .collect()),
            TargetQuery::Family(family) => {
                let releases = self.family_releases(&family)?;
                Ok(releases
                    .iter()
                    .map(|r| (family.clone(), *r))
                    .collect())
            }
            TargetQuery::Versioned {
                family,
                major,
                minor,
            } => {
                let releases = self.family_releases(&family)?;
                let matched: Vec<(String, Release)> = releases
                    .iter()
                    .filter(|(maj, min)| {
                        *maj == major && minor.map_or(true, |m| *min == m)
                    })
                    .map(|r| (family.clone(), *r))
                    .collect();
                if matched.is_empty() {
                    let version = match minor {
                        Some(min) => format!("{major}.{min}"),
                        None => major.to_string(),
                    };
                    return Err(CompatError::UnknownVersion { family, version });
                }
                Ok(matched)
            }
        }
    }

    fn family_releases(&self, family: &str) -> Result<&Vec<Release>, CompatError> {
        self.families
            .get(family)
            .ok_or_else(|| CompatError::UnknownFamily {
                family: family.to_string(),
            })
    }

    /// Returns `true` if `release` of `family` lacks native support per the
    /// given since-table.
    fn needs_polyfill(table: &BTreeMap<String, Release>, family: &str, release: Release) -> bool {
        match table.get(family) {
            Some(since) => release < *since,
            None => true,
        }
    }
}

impl CompatData for MemoryCompat {
    fn module_universe(&self) -> Vec<String> {
        self.modules.iter().map(|(name, _)| name.clone()).collect()
    }

    fn modules_for_target(
        &self,
        target_query: &str,
        filter: &[String],
    ) -> Result<Vec<String>, CompatError> {
        let targets = self.resolve(target_query)?;
        let mut needed = Vec::new();
        for name in filter {
            let Some((_, table)) = self.modules.iter().find(|(n, _)| n == name) else {
                // Unknown identifiers in the filter simply never match.
                continue;
            };
            if targets
                .iter()
                .any(|(family, release)| Self::needs_polyfill(table, family, *release))
            {
                needed.push(name.clone());
            }
        }
        Ok(needed)
    }

    fn known_targets(&self, population_query: &str) -> Result<Vec<String>, CompatError> {
        if population_query.trim().is_empty() {
            return Err(CompatError::Malformed {
                query: population_query.to_string(),
                reason: "empty population query".to_string(),
            });
        }
        // Population share is not modeled; every declared release qualifies.
        let mut targets = Vec::new();
        for (family, releases) in &self.families {
            let mut last_major = None;
            for (major, _) in releases {
                if last_major != Some(*major) {
                    targets.push(format!("{family} {major}"));
                    last_major = Some(*major);
                }
            }
        }
        Ok(targets)
    }

    fn latest_major(&self, family: &str) -> Result<u32, CompatError> {
        let releases = self.family_releases(&family.to_ascii_lowercase())?;
        releases
            .last()
            .map(|(major, _)| *major)
            .ok_or_else(|| CompatError::UnknownFamily {
                family: family.to_string(),
            })
    }
}

impl FeatureSupport for MemoryCompat {
    fn is_supported(&self, target_query: &str, feature: &str) -> Result<bool, SupportError> {
        let table = self
            .features
            .get(feature)
            .ok_or_else(|| SupportError::UnknownFeature {
                feature: feature.to_string(),
            })?;
        let targets = self.resolve(target_query)?;
        Ok(targets
            .iter()
            .all(|(family, release)| !Self::needs_polyfill(table, family, *release)))
    }
}

impl UserAgentParser for MemoryCompat {
    fn parse(&self, ua: &str) -> Result<BrowserId, UaError> {
        for (token, family) in &self.ua_tokens {
            if let Some(pos) = ua.find(token.as_str()) {
                let rest = &ua[pos + token.len()..];
                let version: String = rest
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                if !version.is_empty() {
                    return Ok(BrowserId {
                        family: family.clone(),
                        version,
                    });
                }
            }
        }
        Err(UaError::Unrecognized { ua: ua.to_string() })
    }
}
