//! Read-only access to the browser's SQLite stores through private snapshots.
//!
//! - [`snapshot`]: copy a live database (plus WAL/SHM sidecars) into the scratch dir
//! - [`connection`]: open a snapshot as a read-only handle
//! - [`bookmarks`] / [`favicons`]: the queries run against those handles
//! - [`naming`]: collision-free scratch file names

pub mod bookmarks;
pub mod connection;
pub mod favicons;
pub mod naming;
pub mod snapshot;

pub use bookmarks::{BookmarkRecord, query_bookmarks};
pub use connection::SnapshotDb;
pub use favicons::FaviconBlob;
pub use snapshot::{Sidecar, Snapshot};

/// Build a `LIKE … ESCAPE '\'` pattern matching `needle` as a literal substring.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
