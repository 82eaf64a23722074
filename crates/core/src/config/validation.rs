//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Longest favicon TTL we accept: one week.
const MAX_FAVICON_TTL_SECS: u64 = 7 * 24 * 60 * 60;

const MAX_FAVICON_FILES: usize = 100_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `profile_dir` is empty and no explicit
    /// bookmarks database is given.
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - a resolved database path or the scratch dir is not absolute
    /// - `favicon_ttl_secs` is 0 or exceeds one week
    /// - `favicon_max_files` is 0 or exceeds 100000
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile_dir.as_os_str().is_empty() && self.bookmarks_db.is_none() {
            return Err(ConfigError::Missing {
                field: "profile_dir".into(),
                hint: "Set ZENMARKS_PROFILE_DIR or ZENMARKS_BOOKMARKS_DB environment variable".into(),
            });
        }

        let source = self.source_location();
        for (field, path) in [("bookmarks_db", &source.bookmarks_db), ("favicons_db", &source.favicons_db)] {
            if !path.is_absolute() {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: format!("must be an absolute path, got {}", path.display()),
                });
            }
        }

        if !self.scratch_dir().is_absolute() {
            return Err(ConfigError::Invalid { field: "scratch_dir".into(), reason: "must be an absolute path".into() });
        }

        if self.favicon_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "favicon_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.favicon_ttl_secs > MAX_FAVICON_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "favicon_ttl_secs".into(),
                reason: format!("must not exceed one week ({MAX_FAVICON_TTL_SECS}s)"),
            });
        }

        if self.favicon_max_files == 0 || self.favicon_max_files > MAX_FAVICON_FILES {
            return Err(ConfigError::Invalid {
                field: "favicon_max_files".into(),
                reason: format!("must be between 1 and {MAX_FAVICON_FILES}"),
            });
        }

        if self.bookmarks_db.is_some() && self.favicons_db.is_none() {
            tracing::debug!(
                favicons_db = %source.favicons_db.display(),
                "bookmarks_db overridden without favicons_db; favicons still resolve from profile_dir"
            );
        }

        Ok(())
    }
}
