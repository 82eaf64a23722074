//! One bookmark search, from snapshot to ranked matches.
//!
//! Nothing here ever fails towards the host: every error is logged and turns
//! into fewer (or no) matches. Snapshots are dropped, and their files removed,
//! before a search returns.

use std::path::{Path, PathBuf};

use crate::Error;
use crate::config::{AppConfig, Retention, SourceLocation};
use crate::favicon;
use crate::rank::MatchResult;
use crate::store::{BookmarkRecord, Sidecar, Snapshot, SnapshotDb, query_bookmarks};
use crate::trigger::parse_trigger;

/// Stateless query engine over a browser profile.
#[derive(Debug, Clone)]
pub struct BookmarkEngine {
    source: SourceLocation,
    scratch_dir: PathBuf,
    retention: Retention,
}

impl BookmarkEngine {
    pub fn new(source: SourceLocation, scratch_dir: impl Into<PathBuf>, retention: Retention) -> Self {
        Self { source, scratch_dir: scratch_dir.into(), retention }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.source_location(), config.scratch_dir(), config.retention())
    }

    pub fn source(&self) -> &SourceLocation {
        &self.source
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Handle a raw host query. `None` means the query was not a bookmark search.
    pub async fn match_query(&self, term: &str) -> Option<Vec<MatchResult>> {
        let filter = parse_trigger(term)?;
        Some(self.search(&filter).await)
    }

    /// Bookmarks matching `filter`, ranked and ordered by title.
    pub async fn search(&self, filter: &str) -> Vec<MatchResult> {
        self.prune_favicons().await;

        let bookmarks = match Snapshot::acquire(&self.source.bookmarks_db, &Sidecar::ALL, &self.scratch_dir).await {
            Ok(snapshot) => snapshot,
            Err(Error::SourceAbsent(path)) => {
                tracing::debug!(path = %path.display(), "bookmarks database not found");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to snapshot bookmarks database");
                return Vec::new();
            }
        };

        let records = query_bookmarks(&bookmarks, filter).await;
        drop(bookmarks);

        if records.is_empty() {
            return Vec::new();
        }

        let icons = self.resolve_favicons(&records).await;

        records
            .iter()
            .zip(icons)
            .map(|(record, icon)| MatchResult::new(record, filter, icon))
            .collect()
    }

    /// Favicon paths for `records`, position for position.
    async fn resolve_favicons(&self, records: &[BookmarkRecord]) -> Vec<Option<PathBuf>> {
        let none = || vec![None; records.len()];

        let snapshot = match Snapshot::acquire(&self.source.favicons_db, &Sidecar::ALL, &self.scratch_dir).await {
            Ok(snapshot) => snapshot,
            Err(Error::SourceAbsent(_)) => return none(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to snapshot favicon database");
                return none();
            }
        };

        let db = match SnapshotDb::open(&snapshot).await {
            Ok(db) => db,
            Err(e) => {
                tracing::warn!(conn = %snapshot.id(), error = %e, "failed to open favicon snapshot");
                return none();
            }
        };

        let mut paths = Vec::with_capacity(records.len());
        for record in records {
            paths.push(self.materialize_icon(&db, &record.url).await);
        }

        db.close().await;
        paths
    }

    async fn materialize_icon(&self, db: &SnapshotDb<'_>, url: &str) -> Option<PathBuf> {
        let blob = db.favicon(url).await?;
        match favicon::materialize(&self.scratch_dir, &blob, url).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to materialize favicon");
                None
            }
        }
    }

    /// Give back a favicon file handed out with a match.
    pub async fn release_favicon(&self, path: &Path) -> Result<bool, Error> {
        favicon::release(&self.scratch_dir, path).await
    }

    /// Apply the favicon retention policy now. Returns the number of files removed.
    pub async fn prune_favicons(&self) -> usize {
        match favicon::prune(&self.scratch_dir, self.retention).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(dir = %self.scratch_dir.display(), error = %e, "favicon pruning failed");
                0
            }
        }
    }
}
