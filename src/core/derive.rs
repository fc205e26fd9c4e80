//! Derived tables
//!
//! Both tables here are pure functions of a base table and are never
//! authored by hand.

use crate::data::dataset::{MappingEntry, TableId};
use crate::utils::error::{GenError, GenResult};

/// Suffix marking commands that take a mandatory trailing argument
pub const BRACKET_SUFFIX: &str = "{}";

/// Prefix of every reshaped combining-mark command: backslash, space
pub const ESCAPED_LATEX_PREFIX: &str = "\\ ";

/// Entries whose key ends in `{}`, in their original order
pub fn with_bracket_suffix(entries: &[MappingEntry]) -> Vec<MappingEntry> {
    entries
        .iter()
        .filter(|entry| entry.key.ends_with(BRACKET_SUFFIX))
        .cloned()
        .collect()
}

/// Rebuild a combining-mark key as `\ <key without its first char>{`.
///
/// `^acute` becomes `\ acute{`. Keys are reshaped by code point, so a
/// non-ASCII leading character is dropped whole.
pub fn escaped_latex_key(key: &str) -> Option<String> {
    let mut chars = key.chars();
    chars.next()?;
    Some(format!("{}{}{{", ESCAPED_LATEX_PREFIX, chars.as_str()))
}

/// Reshape every key of the combining-mark table; values are ignored.
pub fn escaped_latex_keys(entries: &[MappingEntry]) -> GenResult<Vec<String>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            escaped_latex_key(&entry.key).ok_or_else(|| {
                GenError::malformed(
                    TableId::CombiningMarks.name(),
                    format!("entry {} has an empty key and cannot be reshaped", index),
                )
            })
        })
        .collect()
}
