//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::bookmark_search::{BookmarkSearchParams, search_impl};
use crate::tools::favicon::{FaviconReleaseParams, purge_impl, release_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use zenmarks_core::BookmarkEngine;

/// The main MCP server handler for mcp-bookmarks.
#[derive(Clone)]
pub struct McpBookmarksServer {
    engine: Arc<BookmarkEngine>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpBookmarksServer {
    /// Create a new server handler around `engine`.
    pub fn new(engine: BookmarkEngine) -> Self {
        Self { engine: Arc::new(engine), tool_router: Self::tool_router() }
    }

    /// Search browser bookmarks.
    ///
    /// Each call snapshots the browser databases, queries the copy and removes it again.
    #[tool(
        description = "Search browser bookmarks. The query must start with 'b ' or 'bookmark ' followed by filter text; \
                       an empty filter lists all bookmarks. Returns ranked matches with optional favicon paths."
    )]
    async fn bookmark_search(&self, params: Parameters<BookmarkSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.engine, params.0).await
    }

    /// Release a favicon file previously returned by bookmark_search.
    #[tool(description = "Delete a favicon file returned by bookmark_search once it is no longer displayed.")]
    async fn favicon_release(&self, params: Parameters<FaviconReleaseParams>) -> Result<CallToolResult, McpError> {
        release_impl(&self.engine, params.0).await
    }

    /// Apply the favicon retention policy immediately.
    #[tool(description = "Delete materialized favicon files that exceed the configured age or count limits.")]
    async fn favicon_purge(&self) -> Result<CallToolResult, McpError> {
        purge_impl(&self.engine).await
    }
}

impl ServerHandler for McpBookmarksServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-bookmarks".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
