//! Bookmark queries against a `places.sqlite` snapshot.

use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

use super::connection::SnapshotDb;
use super::like_pattern;
use super::snapshot::Snapshot;
use crate::Error;

/// A bookmark with a non-empty title and URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub title: String,
    pub url: String,
}

const BOOKMARKS_SQL: &str = "SELECT moz_bookmarks.title, moz_places.url FROM moz_bookmarks
     JOIN moz_places ON moz_bookmarks.fk = moz_places.id
     WHERE moz_bookmarks.title IS NOT NULL AND moz_bookmarks.title != ''";

const FILTER_SQL: &str = " AND (moz_bookmarks.title LIKE ?1 ESCAPE '\\' OR moz_places.url LIKE ?1 ESCAPE '\\')";

const ORDER_SQL: &str = " ORDER BY moz_bookmarks.title";

impl SnapshotDb<'_> {
    /// List bookmarks whose title or URL contains `filter` (ASCII case-insensitive),
    /// ordered by title. An empty filter lists every titled bookmark.
    ///
    /// Rows with an empty title or URL are skipped.
    pub async fn bookmarks(&self, filter: &str) -> Result<Vec<BookmarkRecord>, Error> {
        let pattern = (!filter.is_empty()).then(|| like_pattern(filter));
        self.conn
            .call(move |conn| -> Result<Vec<BookmarkRecord>, Error> {
                let sql = match pattern {
                    Some(_) => format!("{BOOKMARKS_SQL}{FILTER_SQL}{ORDER_SQL}"),
                    None => format!("{BOOKMARKS_SQL}{ORDER_SQL}"),
                };
                let mut stmt = conn.prepare(&sql)?;

                let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(Option<String>, Option<String>)> {
                    Ok((row.get(0)?, row.get(1)?))
                };
                let rows = match &pattern {
                    Some(p) => stmt.query_map(params![p], map_row)?.collect::<Result<Vec<_>, _>>()?,
                    None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
                };

                Ok(rows
                    .into_iter()
                    .filter_map(|(title, url)| match (title, url) {
                        (Some(title), Some(url)) if !title.is_empty() && !url.is_empty() => {
                            Some(BookmarkRecord { title, url })
                        }
                        _ => None,
                    })
                    .collect())
            })
            .await
            .map_err(Error::from)
    }
}

/// Snapshot-level bookmark query that never fails.
///
/// Opening or querying errors are logged and yield no records.
pub async fn query_bookmarks(snapshot: &Snapshot, filter: &str) -> Vec<BookmarkRecord> {
    let db = match SnapshotDb::open(snapshot).await {
        Ok(db) => db,
        Err(e) => {
            tracing::warn!(conn = %snapshot.id(), error = %e, "failed to open bookmarks snapshot");
            return Vec::new();
        }
    };

    let records = match db.bookmarks(filter).await {
        Ok(records) => {
            tracing::debug!(conn = %db.id(), filter, count = records.len(), "bookmark query finished");
            records
        }
        Err(e) => {
            tracing::warn!(conn = %db.id(), filter, error = %e, "bookmark query failed");
            Vec::new()
        }
    };

    db.close().await;
    records
}
