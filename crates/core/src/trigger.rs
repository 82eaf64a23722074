//! Host query parsing.
//!
//! The host forwards everything the user types; bookmark search only reacts to
//! `b <filter>` or `bookmark <filter>` (any case, `bookmarks` works too).

use std::sync::LazyLock;

use regex::Regex;

static TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?:b|bookmark\w*) (.*)$").expect("trigger pattern is valid")
});

/// Extract the filter from a host query.
///
/// Returns `None` when the query is not addressed to bookmark search, and
/// `Some("")` for a bare trigger followed by a space (list everything).
pub fn parse_trigger(term: &str) -> Option<String> {
    TRIGGER
        .captures(term)
        .map(|caps| caps.get(1).map_or_else(String::new, |m| m.as_str().to_string()))
}
