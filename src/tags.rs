//! Tag algebra: normalisation, merging, filename tokenisation and matching.
//!
//! Nothing in here touches the filesystem.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Tokens shorter than this are not worth a tag (`a`, `of`, `v2`...).
pub const DEFAULT_MIN_TAG_LENGTH: usize = 3;

static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z]+").expect("static regex"));

pub fn normalize(tag: &str) -> String {
    tag.to_lowercase()
}

/// Union of `existing` and `incoming`, everything lowercased and deduplicated.
/// Empty strings are dropped.
pub fn merge<T: AsRef<str>>(existing: &BTreeSet<String>, incoming: &[T]) -> BTreeSet<String> {
    existing
        .iter()
        .map(|t| normalize(t))
        .chain(incoming.iter().map(|t| normalize(t.as_ref())))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Candidate tags for a bare filename, using the default minimum length.
///
/// `test_file_1.txt` gives `test`, `file`, `txt`.
pub fn extract_from_name(filename: &str) -> Vec<String> {
    extract_from_name_with(filename, DEFAULT_MIN_TAG_LENGTH)
}

/// Splits on every run of non-ASCII-letters and keeps tokens of at least
/// `min_len` characters. Case is left alone; [`merge`] lowercases.
pub fn extract_from_name_with(filename: &str, min_len: usize) -> Vec<String> {
    NON_ALPHA
        .split(filename)
        .filter(|token| !token.is_empty() && token.len() >= min_len)
        .map(str::to_string)
        .collect()
}

/// True iff every query tag is present. An empty query matches everything.
pub fn matches_all<T: AsRef<str>>(entry_tags: &BTreeSet<String>, query: &[T]) -> bool {
    query
        .iter()
        .all(|tag| entry_tags.contains(&normalize(tag.as_ref())))
}
