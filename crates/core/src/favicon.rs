//! Materialized favicon files.
//!
//! The host renders icons from paths, so icon bytes are written to the scratch
//! dir and the path is handed over with the match. From then on the host owns
//! the file: it can give it back through [`release`], and [`prune`] bounds
//! whatever is never given back by age and count. Files younger than
//! [`HANDOFF_GRACE`] are never removed for count, so a path stays valid for at
//! least that long after it was handed out (or until the age limit, if shorter).

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::Error;
use crate::config::Retention;
use crate::store::FaviconBlob;
use crate::store::naming::{unique_stem, url_digest};

/// File name prefix of every materialized favicon.
pub const FAVICON_PREFIX: &str = "zenmarks-icon-";

/// Minimum age before a favicon counts against the retention count.
pub const HANDOFF_GRACE: Duration = Duration::from_secs(60);

/// Write `blob` for `url` to a fresh file in `scratch_dir`.
pub async fn materialize(scratch_dir: &Path, blob: &FaviconBlob, url: &str) -> Result<PathBuf, Error> {
    let name = format!("{FAVICON_PREFIX}{}-{}.{}", unique_stem(), url_digest(url), sniff_extension(&blob.data));
    let path = scratch_dir.join(name);

    if let Err(source) = tokio::fs::write(&path, &blob.data).await {
        // Never hand out a truncated icon.
        let _ = tokio::fs::remove_file(&path).await;
        return Err(Error::FaviconWrite { path, source });
    }

    Ok(path)
}

/// Guess a file extension from the leading bytes of an image.
fn sniff_extension(data: &[u8]) -> &'static str {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
    const ICO: &[u8] = &[0, 0, 1, 0];

    if data.starts_with(PNG) {
        "png"
    } else if data.starts_with(ICO) {
        "ico"
    } else if data.starts_with(&[0xff, 0xd8, 0xff]) {
        "jpg"
    } else if data.starts_with(b"GIF8") {
        "gif"
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        "webp"
    } else if is_svg(data) {
        "svg"
    } else {
        "bin"
    }
}

fn is_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

fn is_materialized_favicon(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(FAVICON_PREFIX))
}

/// Delete a favicon previously handed to the host.
///
/// Returns `Ok(false)` when the file is already gone.
///
/// # Errors
///
/// `Error::InvalidInput` if `path` is not a materialized favicon directly inside `scratch_dir`.
pub async fn release(scratch_dir: &Path, path: &Path) -> Result<bool, Error> {
    let in_scratch = path.parent().is_some_and(|parent| parent == scratch_dir);
    if !in_scratch || !is_materialized_favicon(path) {
        return Err(Error::InvalidInput(format!("{} is not a materialized favicon", path.display())));
    }

    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Remove favicons older than the retention age, then the oldest ones beyond
/// the retention count. Returns how many files were deleted.
///
/// Files within [`HANDOFF_GRACE`] count towards the limit but are not removed
/// for it, so the directory may briefly hold more than `max_files` icons.
pub async fn prune(scratch_dir: &Path, retention: Retention) -> Result<usize, Error> {
    let now = SystemTime::now();
    let mut entries = tokio::fs::read_dir(scratch_dir).await?;
    let mut kept: Vec<(Duration, PathBuf)> = Vec::new();
    let mut deleted = 0;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_materialized_favicon(&path) {
            continue;
        }
        let Ok(modified) = entry.metadata().await.and_then(|m| m.modified()) else {
            continue;
        };

        let age = now.duration_since(modified).unwrap_or_default();
        if age > retention.max_age {
            if remove_quietly(&path).await {
                deleted += 1;
            }
        } else {
            kept.push((age, path));
        }
    }

    if kept.len() > retention.max_files {
        let excess = kept.len() - retention.max_files;
        kept.sort_by(|a, b| b.0.cmp(&a.0));
        let evictable = kept.into_iter().take_while(|(age, _)| *age >= HANDOFF_GRACE).take(excess);
        for (_, path) in evictable {
            if remove_quietly(&path).await {
                deleted += 1;
            }
        }
    }

    if deleted > 0 {
        tracing::debug!(deleted, dir = %scratch_dir.display(), "pruned materialized favicons");
    }
    Ok(deleted)
}

async fn remove_quietly(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove favicon");
            false
        }
    }
}
