//! Read-only connections onto snapshots.
//!
//! The copy is opened without create permission and pinned to
//! `query_only`, so SQLite can still replay a copied WAL into its private
//! index while no statement is able to modify the data.

use tokio_rusqlite::Connection;
use tokio_rusqlite::rusqlite::OpenFlags;

use super::snapshot::Snapshot;
use crate::Error;

/// Connection onto a [`Snapshot`].
///
/// Borrows the snapshot so the copy cannot be released while the handle is live.
#[derive(Debug)]
pub struct SnapshotDb<'a> {
    pub(crate) conn: Connection,
    snapshot: &'a Snapshot,
}

impl<'a> SnapshotDb<'a> {
    /// Open `snapshot` as a read-only relational handle.
    pub async fn open(snapshot: &'a Snapshot) -> Result<Self, Error> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(snapshot.path().to_path_buf(), flags)
            .await
            .map_err(|e| Error::Database(e.into()))?;

        let db = Self { conn, snapshot };
        if let Err(e) = db.configure().await {
            db.close().await;
            return Err(e);
        }

        tracing::debug!(conn = %snapshot.id(), path = %snapshot.path().display(), "opened snapshot");
        Ok(db)
    }

    async fn configure(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), Error> {
                conn.execute_batch(
                    "PRAGMA query_only=ON;
                     PRAGMA temp_store=MEMORY;",
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Identifier of the underlying snapshot.
    pub fn id(&self) -> &str {
        self.snapshot.id()
    }

    /// Close the connection before the snapshot files are removed.
    pub async fn close(self) {
        let id = self.snapshot.id().to_string();
        if let Err(e) = self.conn.close().await {
            tracing::debug!(conn = %id, error = %e, "closing snapshot connection failed");
        }
    }
}
