//! Parsers for ref advertisements
//!
//! Two formats are understood:
//! - the smart HTTP advertisement (`info/refs?service=git-upload-pack`), a
//!   sequence of pkt-lines
//! - the plain `<hash>\t<ref>` listing printed by `git ls-remote` and served
//!   by dumb HTTP remotes

use std::collections::HashSet;

use crate::version::error::CatalogError;
use crate::version::types::tag_name_from_ref;

/// Length of the hexadecimal pkt-line size header
const PKT_HEADER_LEN: usize = 4;

/// Parses a smart HTTP ref advertisement into tag names
pub fn parse_advertisement(body: &[u8]) -> Result<Vec<String>, CatalogError> {
    let mut ref_names = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        if rest.len() < PKT_HEADER_LEN {
            return Err(CatalogError::InvalidResponse(
                "truncated pkt-line header".to_string(),
            ));
        }

        let len = std::str::from_utf8(&rest[..PKT_HEADER_LEN])
            .ok()
            .and_then(|hex| usize::from_str_radix(hex, 16).ok())
            .ok_or_else(|| {
                CatalogError::InvalidResponse(format!(
                    "invalid pkt-line length: {:?}",
                    String::from_utf8_lossy(&rest[..PKT_HEADER_LEN])
                ))
            })?;

        // flush, delimiter and response-end packets carry no payload
        if len < PKT_HEADER_LEN {
            rest = &rest[PKT_HEADER_LEN..];
            continue;
        }

        if len > rest.len() {
            return Err(CatalogError::InvalidResponse(format!(
                "pkt-line of {} bytes exceeds remaining {} bytes",
                len,
                rest.len()
            )));
        }

        let payload = String::from_utf8_lossy(&rest[PKT_HEADER_LEN..len]);
        rest = &rest[len..];

        let line = payload.trim_end_matches('\n');
        if line.starts_with('#') {
            continue;
        }

        // the first ref line carries capabilities after a NUL byte
        let line = line.split('\0').next().unwrap_or_default();
        if let Some((_, ref_name)) = line.split_once(' ') {
            ref_names.push(ref_name.to_string());
        }
    }

    Ok(collect_tag_names(ref_names.iter().map(String::as_str)))
}

/// Parses `git ls-remote` output into tag names
pub fn parse_ls_remote(output: &str) -> Vec<String> {
    collect_tag_names(
        output
            .lines()
            .filter_map(|line| line.split_once('\t'))
            .map(|(_, ref_name)| ref_name.trim()),
    )
}

/// Keeps tag refs, dropping duplicates produced by peeled entries
fn collect_tag_names<'a>(ref_names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ref_names
        .filter_map(tag_name_from_ref)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
