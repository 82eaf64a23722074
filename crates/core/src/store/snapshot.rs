//! Point-in-time copies of a live SQLite database.
//!
//! Reading the browser's files directly would contend for its locks, so every
//! query runs against a private copy of the main file plus whatever WAL and
//! shared-memory sidecars exist. The copy is removed when the [`Snapshot`]
//! is dropped, on every exit path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::naming::unique_stem;
use crate::Error;

/// File name prefix of every snapshot copy.
pub const SNAPSHOT_PREFIX: &str = "zenmarks-snap-";

/// Auxiliary files SQLite keeps next to a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sidecar {
    /// Write-ahead log holding recent, not yet checkpointed writes.
    Wal,
    /// Shared-memory index for the write-ahead log.
    Shm,
}

impl Sidecar {
    pub const ALL: [Sidecar; 2] = [Sidecar::Wal, Sidecar::Shm];

    pub fn suffix(self) -> &'static str {
        match self {
            Sidecar::Wal => "-wal",
            Sidecar::Shm => "-shm",
        }
    }

    /// Path of this sidecar for the database at `db`.
    pub fn path_for(self, db: &Path) -> PathBuf {
        with_suffix(db, self.suffix())
    }
}

/// Companion files that may appear next to our copy, either copied by us or
/// created by SQLite while reading it.
const COMPANION_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// A private copy of a database and its sidecars.
///
/// Dropping it unlinks the copies with blocking calls; at most four small
/// files are removed, which is cheap enough to do on an async worker.
#[derive(Debug)]
pub struct Snapshot {
    id: String,
    path: PathBuf,
    sidecars: Vec<Sidecar>,
}

impl Snapshot {
    /// Copy `source` (and each of `sidecars` that exists) into `scratch_dir`.
    ///
    /// # Errors
    ///
    /// - `Error::SourceAbsent` if `source` does not exist; nothing is created.
    /// - `Error::Copy` if the main file cannot be copied; any partial copy is removed.
    ///
    /// A sidecar that fails to copy is logged and skipped: a missing WAL only
    /// makes the view staler, it cannot make it inconsistent.
    pub async fn acquire(source: &Path, sidecars: &[Sidecar], scratch_dir: &Path) -> Result<Self, Error> {
        if !tokio::fs::try_exists(source).await.unwrap_or(false) {
            return Err(Error::SourceAbsent(source.to_path_buf()));
        }

        let id = unique_stem();
        let path = scratch_dir.join(format!("{SNAPSHOT_PREFIX}{id}.sqlite"));

        // Constructed before copying so a half-written file is cleaned up too.
        let mut snapshot = Self { id, path, sidecars: Vec::new() };

        if let Err(source_err) = tokio::fs::copy(source, &snapshot.path).await {
            return Err(Error::Copy { from: source.to_path_buf(), to: snapshot.path.clone(), source: source_err });
        }

        for &sidecar in sidecars {
            let from = sidecar.path_for(source);
            if !tokio::fs::try_exists(&from).await.unwrap_or(false) {
                continue;
            }
            match tokio::fs::copy(&from, sidecar.path_for(&snapshot.path)).await {
                Ok(_) => snapshot.sidecars.push(sidecar),
                Err(e) => tracing::warn!(
                    snapshot = %snapshot.id,
                    sidecar = sidecar.suffix(),
                    error = %e,
                    "sidecar copy failed, continuing without it"
                ),
            }
        }

        tracing::debug!(
            snapshot = %snapshot.id,
            source = %source.display(),
            sidecars = ?snapshot.sidecars,
            "acquired snapshot"
        );

        Ok(snapshot)
    }

    /// Unique identifier, also used as the connection name in logs.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the main-file copy.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecars that were copied successfully.
    pub fn sidecars(&self) -> &[Sidecar] {
        &self.sidecars
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        let companions = COMPANION_SUFFIXES.iter().map(|suffix| with_suffix(&self.path, suffix));
        for path in std::iter::once(self.path.clone()).chain(companions) {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove snapshot file"),
            }
        }
        tracing::debug!(snapshot = %self.id, "released snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_acquire_missing_source() {
        let source_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();

        let result = Snapshot::acquire(&source_dir.path().join("places.sqlite"), &Sidecar::ALL, scratch.path()).await;

        assert!(matches!(result, Err(Error::SourceAbsent(_))));
        assert!(scratch_entries(scratch.path()).is_empty());
    }

    #[tokio::test]
    async fn test_acquire_copies_existing_sidecars() {
        let source_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("places.sqlite");
        std::fs::write(&source, b"main").unwrap();
        std::fs::write(Sidecar::Wal.path_for(&source), b"wal").unwrap();

        let snapshot = Snapshot::acquire(&source, &Sidecar::ALL, scratch.path()).await.unwrap();

        assert_eq!(snapshot.sidecars(), &[Sidecar::Wal]);
        assert_eq!(std::fs::read(snapshot.path()).unwrap(), b"main");
        assert_eq!(std::fs::read(Sidecar::Wal.path_for(snapshot.path())).unwrap(), b"wal");
        assert!(!Sidecar::Shm.path_for(snapshot.path()).exists());
        assert!(snapshot.path().file_name().unwrap().to_string_lossy().starts_with(SNAPSHOT_PREFIX));
    }

    #[tokio::test]
    async fn test_drop_removes_all_copies() {
        let source_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("places.sqlite");
        std::fs::write(&source, b"main").unwrap();
        std::fs::write(Sidecar::Wal.path_for(&source), b"wal").unwrap();
        std::fs::write(Sidecar::Shm.path_for(&source), b"shm").unwrap();

        let snapshot = Snapshot::acquire(&source, &Sidecar::ALL, scratch.path()).await.unwrap();
        assert_eq!(scratch_entries(scratch.path()).len(), 3);

        // A journal SQLite might leave behind is swept as well.
        std::fs::write(with_suffix(snapshot.path(), "-journal"), b"j").unwrap();
        drop(snapshot);

        assert!(scratch_entries(scratch.path()).is_empty());
        assert!(source.exists(), "source must never be touched");
    }

    #[tokio::test]
    async fn test_sidecars_not_requested_are_skipped() {
        let source_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("favicons.sqlite");
        std::fs::write(&source, b"main").unwrap();
        std::fs::write(Sidecar::Wal.path_for(&source), b"wal").unwrap();

        let snapshot = Snapshot::acquire(&source, &[], scratch.path()).await.unwrap();
        assert!(snapshot.sidecars().is_empty());
        assert_eq!(scratch_entries(scratch.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_copy_failure_leaves_nothing() {
        let source_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("places.sqlite");
        std::fs::write(&source, b"main").unwrap();
        let missing_scratch = source_dir.path().join("does-not-exist");

        let result = Snapshot::acquire(&source, &Sidecar::ALL, &missing_scratch).await;

        assert!(matches!(result, Err(Error::Copy { .. })));
        assert!(!missing_scratch.exists());
    }

    #[tokio::test]
    async fn test_sidecar_copy_failure_is_skipped() {
        let source_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("places.sqlite");
        std::fs::write(&source, b"main").unwrap();
        // Exists but cannot be copied as a file.
        std::fs::create_dir(Sidecar::Wal.path_for(&source)).unwrap();
        std::fs::write(Sidecar::Shm.path_for(&source), b"shm").unwrap();

        let snapshot = Snapshot::acquire(&source, &Sidecar::ALL, scratch.path()).await.unwrap();

        assert_eq!(snapshot.sidecars(), &[Sidecar::Shm]);
        assert!(!Sidecar::Wal.path_for(snapshot.path()).exists());
        assert_eq!(std::fs::read(Sidecar::Shm.path_for(snapshot.path())).unwrap(), b"shm");

        drop(snapshot);
        assert!(scratch_entries(scratch.path()).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_snapshots_get_distinct_names() {
        let source_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("places.sqlite");
        std::fs::write(&source, b"main").unwrap();

        let (a, b) = tokio::join!(
            Snapshot::acquire(&source, &Sidecar::ALL, scratch.path()),
            Snapshot::acquire(&source, &Sidecar::ALL, scratch.path()),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.id(), b.id());
        assert_ne!(a.path(), b.path());
    }
}
