//! Target-query parsing.
//!
//! A target query is the structured string the resolver hands to the
//! compatibility oracles: `"defaults"`, a bare family, or a family with a
//! major (and optional minor) version.

use crate::CompatError;

/// The reserved query matching the conservative baseline of every family.
pub const DEFAULTS_QUERY: &str = "defaults";

/// A parsed target query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetQuery {
    /// The `"defaults"` baseline: every family at its oldest known release.
    Defaults,
    /// A bare family, covering all of its known releases.
    Family(
        /// Lowercase family name.
        String,
    ),
    /// A family pinned to a specific release.
    Versioned {
        /// Lowercase family name.
        family: String,
        /// Major version.
        major: u32,
        /// Minor version, when the query carried one.
        minor: Option<u32>,
    },
}

impl TargetQuery {
    /// Parses a raw query string.
    ///
    /// Syntax errors are reported as [`CompatError::Malformed`]; family and
    /// version existence is checked later against the database tables.
    pub fn parse(raw: &str) -> Result<Self, CompatError> {
        let malformed = |reason: &str| CompatError::Malformed {
            query: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(malformed("empty query"));
        }
        if trimmed == DEFAULTS_QUERY {
            return Ok(TargetQuery::Defaults);
        }

        let mut parts = trimmed.split_whitespace();
        let family = parts.next().unwrap_or_default().to_ascii_lowercase();
        let version = parts.next();
        if parts.next().is_some() {
            return Err(malformed("expected at most two tokens"));
        }

        let Some(version) = version else {
            return Ok(TargetQuery::Family(family));
        };

        let mut numbers = version.split('.');
        let major = numbers
            .next()
            .unwrap_or_default()
            .parse::<u32>()
            .map_err(|_| malformed("major version is not numeric"))?;
        let minor = match numbers.next() {
            Some(m) => Some(
                m.parse::<u32>()
                    .map_err(|_| malformed("minor version is not numeric"))?,
            ),
            None => None,
        };
        if numbers.next().is_some() {
            return Err(malformed("version has more than two components"));
        }

        Ok(TargetQuery::Versioned {
            family,
            major,
            minor,
        })
    }
}
