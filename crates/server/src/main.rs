//! mcp-bookmarks server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;
use zenmarks_core::{AppConfig, BookmarkEngine};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let engine = BookmarkEngine::from_config(&config);

    tracing::info!(
        bookmarks_db = %engine.source().bookmarks_db.display(),
        favicons_db = %engine.source().favicons_db.display(),
        scratch_dir = %engine.scratch_dir().display(),
        "Starting mcp-bookmarks server on stdio transport"
    );

    let handler = handler::McpBookmarksServer::new(engine);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
