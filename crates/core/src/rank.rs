//! Relevance scoring and projection of bookmarks into host-facing matches.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::BookmarkRecord;

/// Score for a bookmark listed without a filter, or matched only through its URL.
pub const BASE_RELEVANCE: f32 = 0.8;
/// Score when the title contains the filter.
pub const TITLE_CONTAINS_RELEVANCE: f32 = 0.9;
/// Score when the title starts with the filter.
pub const TITLE_PREFIX_RELEVANCE: f32 = 1.0;

/// A ranked bookmark ready for the host to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchResult {
    /// `title - url`, or just the title when there is no URL.
    pub display_text: String,
    /// URL to open when the match is chosen.
    pub url: String,
    /// Materialized favicon, owned by the host once returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_path: Option<PathBuf>,
    /// Relevance in `[0, 1]`.
    pub relevance: f32,
}

impl MatchResult {
    pub fn new(record: &BookmarkRecord, filter: &str, favicon_path: Option<PathBuf>) -> Self {
        Self {
            display_text: display_text(&record.title, &record.url),
            url: record.url.clone(),
            favicon_path,
            relevance: relevance(&record.title, filter),
        }
    }
}

/// Relevance of a bookmark titled `title` for `filter`.
///
/// A prefix match beats a containment match, which beats everything else.
pub fn relevance(title: &str, filter: &str) -> f32 {
    if filter.is_empty() {
        return BASE_RELEVANCE;
    }

    let title = title.to_lowercase();
    let filter = filter.to_lowercase();
    if title.starts_with(&filter) {
        TITLE_PREFIX_RELEVANCE
    } else if title.contains(&filter) {
        TITLE_CONTAINS_RELEVANCE
    } else {
        BASE_RELEVANCE
    }
}

pub fn display_text(title: &str, url: &str) -> String {
    if url.is_empty() { title.to_string() } else { format!("{title} - {url}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_base() {
        assert_eq!(relevance("GitHub", ""), BASE_RELEVANCE);
    }

    #[test]
    fn test_prefix_match() {
        assert_eq!(relevance("GitHub", "git"), 1.0);
        assert_eq!(relevance("gitter chat", "GIT"), 1.0);
    }

    #[test]
    fn test_contains_match() {
        assert_eq!(relevance("The GitHub Blog", "github"), 0.9);
    }

    #[test]
    fn test_url_only_match() {
        assert_eq!(relevance("Code hosting", "github"), 0.8);
    }

    #[test]
    fn test_prefix_wins_over_contains() {
        // "ab" occurs at the start and again later; prefix still decides.
        assert_eq!(relevance("abcab", "ab"), TITLE_PREFIX_RELEVANCE);
    }

    #[test]
    fn test_non_ascii_case_folding() {
        assert_eq!(relevance("Über uns", "über"), 1.0);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text("GitHub", "https://github.com"), "GitHub - https://github.com");
        assert_eq!(display_text("GitHub", ""), "GitHub");
    }

    #[test]
    fn test_match_result_from_record() {
        let record = BookmarkRecord { title: "Gitter Chat".into(), url: "https://gitter.im".into() };
        let result = MatchResult::new(&record, "git", None);
        assert_eq!(result.display_text, "Gitter Chat - https://gitter.im");
        assert_eq!(result.url, "https://gitter.im");
        assert_eq!(result.relevance, 1.0);
        assert!(result.favicon_path.is_none());
    }

    #[test]
    fn test_match_result_json_omits_missing_favicon() {
        let record = BookmarkRecord { title: "Docs".into(), url: "https://docs.rs".into() };
        let json = serde_json::to_value(MatchResult::new(&record, "", None)).unwrap();
        assert!(json.get("favicon_path").is_none());
        assert_eq!(json["display_text"], "Docs - https://docs.rs");
    }
}
