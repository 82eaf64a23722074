//! Collision-free names for scratch artifacts.
//!
//! Every generated name embeds a nanosecond timestamp, the process id and a
//! per-process sequence number, so overlapping invocations (in this process or
//! another one sharing the temp dir) never pick the same file.

use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a unique name stem.
pub fn unique_stem() -> String {
    let now = chrono::Utc::now();
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros() * 1_000);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{nanos}-{}-{seq}", std::process::id())
}

/// Short, stable digest of a URL for use in file names.
pub fn url_digest(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}
