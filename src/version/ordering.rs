//! Version ordering
//!
//! Versions are ordered through a [`VersionComparisonKey`]:
//!
//! 1. `-` and `+` are rewritten to `.`
//! 2. every `.p<digit>` patch marker becomes `.z<digit>`
//! 3. a trailing `.z` sentinel is appended
//!
//! Keys compare on their first five dot-separated fields. Field 1 compares
//! byte-wise, fields 2-5 numerically on their leading digits with the rest of
//! the field as a byte-wise tie-break. A missing field sorts lowest. Remaining
//! ties fall back to the whole key and then to the original tag text, so the
//! result does not depend on input order.
//!
//! Only five fields take part in the field comparison; further segments are
//! seen by the whole-key tie-break alone.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::types::VersionTag;

/// Number of dot-separated fields compared positionally
pub const COMPARED_FIELDS: usize = 5;

/// Sentinel appended to every key
const SENTINEL: &str = "z";

static PATCH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.p(\d)").expect("patch marker pattern is valid"));

/// Order-preserving representation of a version identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionComparisonKey {
    key: String,
}

impl VersionComparisonKey {
    pub fn new(version: &str) -> Self {
        let dotted = version.replace(['-', '+'], ".");
        let mut key = PATCH_MARKER.replace_all(&dotted, ".z$1").into_owned();
        key.push('.');
        key.push_str(SENTINEL);
        Self { key }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    fn fields(&self) -> impl Iterator<Item = &str> {
        self.key.split('.')
    }
}

impl Ord for VersionComparisonKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.fields();
        let mut right = other.fields();

        for index in 0..COMPARED_FIELDS {
            let ordering = match (left.next(), right.next()) {
                (None, None) => break,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) if index == 0 => a.as_bytes().cmp(b.as_bytes()),
                (Some(a), Some(b)) => compare_numeric_field(a, b),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        self.key.as_bytes().cmp(other.key.as_bytes())
    }
}

impl PartialOrd for VersionComparisonKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares two fields by their leading digit runs, then by what follows.
///
/// A field without leading digits reads as zero. Digit runs of any length
/// are compared without parsing into a fixed-width integer.
fn compare_numeric_field(a: &str, b: &str) -> Ordering {
    let (a_digits, a_rest) = split_leading_digits(a);
    let (b_digits, b_rest) = split_leading_digits(b);

    compare_digit_runs(a_digits, b_digits).then_with(|| a_rest.as_bytes().cmp(b_rest.as_bytes()))
}

fn split_leading_digits(field: &str) -> (&str, &str) {
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    field.split_at(end)
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compares two version strings
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    VersionComparisonKey::new(a)
        .cmp(&VersionComparisonKey::new(b))
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

/// Sorts tags ascending by their display names.
///
/// The sort is stable; tags with identical names keep their input order.
pub fn sort_versions(tags: Vec<VersionTag>) -> Vec<VersionTag> {
    let mut keyed: Vec<(VersionComparisonKey, VersionTag)> = tags
        .into_iter()
        .map(|tag| (VersionComparisonKey::new(tag.name()), tag))
        .collect();

    keyed.sort_by(|(a_key, a_tag), (b_key, b_tag)| {
        a_key
            .cmp(b_key)
            .then_with(|| a_tag.name().as_bytes().cmp(b_tag.name().as_bytes()))
    });

    keyed.into_iter().map(|(_, tag)| tag).collect()
}
