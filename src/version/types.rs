//! Common types for the version catalog

use std::fmt;

/// Tag namespace stripped from ref names
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Suffix git appends to peeled annotated-tag refs
pub const PEELED_SUFFIX: &str = "^{}";

/// A version identifier as published by the remote.
///
/// `raw` is the tag exactly as the remote names it and is what gets checked
/// out; `name` has the conventional version prefix stripped and is what gets
/// compared and printed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTag {
    raw: String,
    name: String,
}

impl VersionTag {
    /// Creates a tag whose display name equals its raw text
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            name: raw.clone(),
            raw,
        }
    }

    /// Creates a tag with `prefix` stripped from the display name, if present
    pub fn with_stripped_prefix(raw: impl Into<String>, prefix: &str) -> Self {
        let raw = raw.into();
        let name = if prefix.is_empty() {
            raw.clone()
        } else {
            raw.strip_prefix(prefix).unwrap_or(&raw).to_string()
        };
        Self { raw, name }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered, filtered versions of one tool, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSet {
    pub tags: Vec<VersionTag>,
}

impl VersionSet {
    pub fn new(tags: Vec<VersionTag>) -> Self {
        Self { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Highest version in the set
    pub fn last(&self) -> Option<&VersionTag> {
        self.tags.last()
    }

    /// Finds a tag by display name or raw text
    pub fn find(&self, version: &str) -> Option<&VersionTag> {
        self.tags
            .iter()
            .find(|tag| tag.name() == version || tag.raw() == version)
    }

    pub fn names(&self) -> Vec<String> {
        self.tags.iter().map(|tag| tag.name().to_string()).collect()
    }
}

/// Reduces a ref name from a listing to its tag name.
///
/// Returns `None` for refs outside the tag namespace. Peeled refs map to the
/// tag they peel.
pub fn tag_name_from_ref(ref_name: &str) -> Option<&str> {
    let name = ref_name.strip_prefix(TAG_REF_PREFIX)?;
    let name = name.strip_suffix(PEELED_SUFFIX).unwrap_or(name);
    (!name.is_empty()).then_some(name)
}
