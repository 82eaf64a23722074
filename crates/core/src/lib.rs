//! Core of zenmarks: bookmark search over a running browser's SQLite stores.
//!
//! This crate provides:
//! - Snapshots of live, WAL-journaled databases that are removed on drop
//! - Bookmark and favicon queries against those snapshots
//! - Relevance ranking and favicon materialization for the host
//! - Configuration structures and unified error types

pub mod config;
pub mod engine;
pub mod error;
pub mod favicon;
pub mod rank;
pub mod store;
pub mod trigger;

pub use config::{AppConfig, ConfigError, SourceLocation};
pub use engine::BookmarkEngine;
pub use error::Error;
pub use rank::MatchResult;
pub use store::{BookmarkRecord, FaviconBlob, Snapshot};
pub use trigger::parse_trigger;
