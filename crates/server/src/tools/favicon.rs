//! favicon_release and favicon_purge tool implementations.
//!
//! Favicon files handed out with matches belong to the host. It hands them
//! back with favicon_release once rendered; favicon_purge applies the
//! retention policy on demand.

use std::path::PathBuf;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use zenmarks_core::{BookmarkEngine, Error};

/// Parameters for the favicon_release tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconReleaseParams {
    /// A `favicon_path` previously returned by bookmark_search.
    pub path: PathBuf,
}

/// Output from the favicon_release tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconReleaseOutput {
    /// False when the file was already gone.
    pub released: bool,
}

/// Output from the favicon_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaviconPurgeOutput {
    /// Number of favicon files deleted.
    pub deleted: usize,
}

/// Implementation of the favicon_release tool.
pub async fn release_impl(engine: &BookmarkEngine, params: FaviconReleaseParams) -> Result<CallToolResult, McpError> {
    let released = engine.release_favicon(&params.path).await?;

    let output = FaviconReleaseOutput { released };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Implementation of the favicon_purge tool.
pub async fn purge_impl(engine: &BookmarkEngine) -> Result<CallToolResult, McpError> {
    let output = FaviconPurgeOutput { deleted: engine.prune_favicons().await };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
