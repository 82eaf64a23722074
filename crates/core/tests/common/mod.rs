//! Browser profile fixtures for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::Connection;
use zenmarks_core::BookmarkEngine;
use zenmarks_core::config::{Retention, SourceLocation};

const PLACES_SCHEMA: &str = include_str!("../fixtures/places.sql");
const FAVICONS_SCHEMA: &str = include_str!("../fixtures/favicons.sql");

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// A throwaway profile directory plus a scratch directory for the engine.
pub struct Profile {
    pub profile: TempDir,
    pub scratch: TempDir,
}

impl Profile {
    pub fn new() -> Self {
        Self { profile: tempfile::tempdir().unwrap(), scratch: tempfile::tempdir().unwrap() }
    }

    pub fn source(&self) -> SourceLocation {
        SourceLocation::from_profile(self.profile.path())
    }

    pub fn places(&self) -> PathBuf {
        self.source().bookmarks_db
    }

    pub fn favicons(&self) -> PathBuf {
        self.source().favicons_db
    }

    pub fn engine(&self) -> BookmarkEngine {
        let retention = Retention { max_age: Duration::from_secs(3600), max_files: 256 };
        BookmarkEngine::new(self.source(), self.scratch.path(), retention)
    }

    pub fn with_bookmarks(self, bookmarks: &[(&str, &str)]) -> Self {
        let conn = Connection::open(self.places()).unwrap();
        conn.execute_batch(PLACES_SCHEMA).unwrap();
        for (title, url) in bookmarks {
            insert_bookmark(&conn, title, url);
        }
        self
    }

    pub fn with_favicons(self, icons: &[(&str, i64, &[u8])]) -> Self {
        let conn = Connection::open(self.favicons()).unwrap();
        conn.execute_batch(FAVICONS_SCHEMA).unwrap();
        for (page_url, width, data) in icons {
            conn.execute(
                "INSERT INTO moz_pages_w_icons (page_url, page_url_hash) VALUES (?1, 0)",
                params![page_url],
            )
            .unwrap();
            let page = conn.last_insert_rowid();
            conn.execute(
                "INSERT INTO moz_icons (icon_url, fixed_icon_url_hash, width, data) VALUES (?1, 0, ?2, ?3)",
                params![format!("{page_url}/favicon.ico"), width, data],
            )
            .unwrap();
            let icon = conn.last_insert_rowid();
            conn.execute("INSERT INTO moz_icons_to_pages (page_id, icon_id) VALUES (?1, ?2)", params![page, icon])
                .unwrap();
        }
        self
    }

    /// Names of everything left in the scratch dir.
    pub fn scratch_entries(&self) -> Vec<String> {
        scratch_entries(self.scratch.path())
    }
}

pub fn scratch_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn insert_bookmark(conn: &Connection, title: &str, url: &str) {
    conn.execute("INSERT INTO moz_places (url) VALUES (?1)", params![url]).unwrap();
    let place = conn.last_insert_rowid();
    conn.execute("INSERT INTO moz_bookmarks (type, fk, parent, title) VALUES (1, ?1, 3, ?2)", params![place, title])
        .unwrap();
}

/// Open `places` the way a running browser does: WAL journaling with
/// checkpoints disabled, so new rows live only in the `-wal` file while the
/// returned connection stays open.
pub fn live_browser(places: &Path) -> Connection {
    let conn = Connection::open(places).unwrap();
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA wal_autocheckpoint=0;",
    )
    .unwrap();
    conn
}
