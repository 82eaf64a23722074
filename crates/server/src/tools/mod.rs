//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-bookmarks server.

pub mod bookmark_search;
pub mod favicon;
