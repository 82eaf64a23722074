//! bookmark_search tool implementation.
//!
//! Runs a host query (`b <filter>` / `bookmark <filter>`) against a fresh
//! snapshot of the browser profile.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use zenmarks_core::{BookmarkEngine, Error, MatchResult, parse_trigger};

/// Input parameters for bookmark_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookmarkSearchParams {
    /// Raw query as typed, including the trigger (e.g. "b github").
    pub query: String,
}

/// Output structure for bookmark_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookmarkSearchOutput {
    /// Whether the query started with a bookmark trigger.
    pub triggered: bool,
    /// Filter text after the trigger (empty lists every bookmark).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Ranked matches, ordered by title.
    pub matches: Vec<MatchResult>,
}

/// Implementation of the bookmark_search tool.
///
/// Data problems never become tool errors; they show up as fewer matches.
pub async fn search_impl(engine: &BookmarkEngine, params: BookmarkSearchParams) -> Result<CallToolResult, McpError> {
    let output = match parse_trigger(&params.query) {
        Some(filter) => {
            let matches = engine.search(&filter).await;
            tracing::debug!(filter = %filter, count = matches.len(), "bookmark search");
            BookmarkSearchOutput { triggered: true, filter: Some(filter), matches }
        }
        None => BookmarkSearchOutput { triggered: false, filter: None, matches: Vec::new() },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize matches: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
