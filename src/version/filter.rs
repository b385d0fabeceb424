//! Tool-specific tag inclusion predicates

use regex::Regex;
use semver::Version;
use serde::Deserialize;

use crate::version::error::CatalogError;
use crate::version::types::VersionTag;

/// Markers that identify a pre-release tag when it does not parse as semver
const PRERELEASE_MARKERS: &[&str] = &["alpha", "beta", "rc", "dev", "nightly", "pre"];

/// Inclusion predicate as it appears in configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilterConfig {
    /// Keep every tag
    All,
    /// Keep tags starting with a literal prefix
    Prefix { prefix: String },
    /// Keep tags matching a regular expression
    Regex { pattern: String },
    /// Keep tags that are not pre-releases
    Stable,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig::Prefix {
            prefix: "dev-".to_string(),
        }
    }
}

/// Compiled inclusion predicate
#[derive(Debug, Clone)]
pub enum TagFilter {
    All,
    Prefix(String),
    Regex(Regex),
    Stable,
}

impl TagFilter {
    /// Compiles a filter from its configuration
    pub fn from_config(config: &FilterConfig) -> Result<Self, CatalogError> {
        Ok(match config {
            FilterConfig::All => TagFilter::All,
            FilterConfig::Prefix { prefix } => TagFilter::Prefix(prefix.clone()),
            FilterConfig::Regex { pattern } => TagFilter::Regex(Regex::new(pattern)?),
            FilterConfig::Stable => TagFilter::Stable,
        })
    }

    /// Returns true if the tag should be offered for installation
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Prefix(prefix) => tag.starts_with(prefix.as_str()),
            TagFilter::Regex(regex) => regex.is_match(tag),
            TagFilter::Stable => !is_prerelease(tag),
        }
    }

    /// Keeps the relevant tags in their input order.
    ///
    /// The predicate sees the raw tag text; `strip_prefix` is removed from the
    /// display name of every kept tag.
    pub fn filter_relevant<I>(&self, tags: I, strip_prefix: &str) -> Vec<VersionTag>
    where
        I: IntoIterator<Item = String>,
    {
        tags.into_iter()
            .filter(|tag| self.matches(tag))
            .map(|tag| VersionTag::with_stripped_prefix(tag, strip_prefix))
            .collect()
    }
}

fn is_prerelease(tag: &str) -> bool {
    let stripped = tag.strip_prefix('v').unwrap_or(tag);
    if let Ok(version) = Version::parse(stripped) {
        return !version.pre.is_empty();
    }

    let lower = stripped.to_ascii_lowercase();
    lower
        .split(['.', '-', '+', '_'])
        .any(|segment| {
            PRERELEASE_MARKERS.iter().any(|marker| {
                segment
                    .strip_prefix(marker)
                    .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
            })
        })
}
