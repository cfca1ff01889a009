//! Folder and file naming rules shared by the scraper, pipeline, and CLI.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of title words joined before truncation.
pub const SHORT_TITLE_MAX_WORDS: usize = 8;

/// Maximum length, in characters, of a shortened title.
pub const SHORT_TITLE_MAX_CHARS: usize = 10;

static OFFER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)/").expect("valid offer id regex"));

/// Joins the first eight whitespace-separated words with `_`, then keeps at
/// most ten characters of the result.
///
/// The truncation happens after joining, so most long titles collapse to
/// their first word or two.
#[must_use]
pub fn shorten_title(title: &str) -> String {
    let joined = title
        .split_whitespace()
        .take(SHORT_TITLE_MAX_WORDS)
        .collect::<Vec<_>>()
        .join("_");
    joined.chars().take(SHORT_TITLE_MAX_CHARS).collect()
}

/// Returns the first run of digits enclosed by slashes in `href`.
#[must_use]
pub fn extract_offer_id(href: &str) -> Option<String> {
    OFFER_ID_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Integer-divides a decimal id by 100, operating on the digit string so that
/// ids wider than `u64` still work. Leading zeros are dropped; ids below 100
/// yield `"0"`.
#[must_use]
pub fn id_batch(unique_id: &str) -> String {
    let digits = unique_id.trim_start_matches('0');
    if digits.len() <= 2 {
        return "0".to_owned();
    }
    digits[..digits.len() - 2].to_owned()
}

/// Removes exact duplicates, keeping the first occurrence of each value.
#[must_use]
pub fn dedupe_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
