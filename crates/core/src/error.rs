//! Unified error types for zenmarks.
//!
//! Most of these never reach the host: the engine logs them and degrades to
//! fewer (or no) results. Only the favicon release path surfaces them as MCP errors.

use std::path::PathBuf;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the bookmark query engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source database does not exist (browser not installed or never run).
    #[error("SOURCE_ABSENT: {}", .0.display())]
    SourceAbsent(PathBuf),

    /// Copying the main database file into the scratch area failed.
    #[error("COPY_FAILED: {} -> {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening or querying a snapshot failed.
    #[error("DATABASE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Writing a materialized favicon failed.
    #[error("FAVICON_WRITE_FAILED: {}: {source}", path.display())]
    FaviconWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid input parameters (e.g., a release path outside the scratch area).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Scratch area I/O failed.
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::SourceAbsent(_) => -32001,
            Error::Copy { .. } | Error::Io(_) => -32002,
            Error::Database(_) => -32003,
            Error::FaviconWrite { .. } => -32004,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SourceAbsent(PathBuf::from("/profile/places.sqlite"));
        assert!(err.to_string().contains("SOURCE_ABSENT"));
        assert!(err.to_string().contains("/profile/places.sqlite"));
    }

    #[test]
    fn test_copy_error_keeps_source() {
        let err = Error::Copy {
            from: PathBuf::from("/a"),
            to: PathBuf::from("/b"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("COPY_FAILED"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("outside scratch dir".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert!(mcp_err.message.contains("outside scratch dir"));
    }
}
