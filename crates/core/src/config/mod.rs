//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (ZENMARKS_*)
//! 2. TOML config file (if ZENMARKS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// File name of the bookmarks/history database inside a browser profile.
pub const PLACES_DB: &str = "places.sqlite";

/// File name of the favicon database inside a browser profile.
pub const FAVICONS_DB: &str = "favicons.sqlite";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (ZENMARKS_*)
/// 2. TOML config file (if ZENMARKS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Browser profile directory holding `places.sqlite` and `favicons.sqlite`.
    ///
    /// Set via ZENMARKS_PROFILE_DIR environment variable.
    #[serde(default = "default_profile_dir")]
    pub profile_dir: PathBuf,

    /// Explicit bookmarks database path, overriding `<profile_dir>/places.sqlite`.
    ///
    /// Set via ZENMARKS_BOOKMARKS_DB environment variable.
    #[serde(default)]
    pub bookmarks_db: Option<PathBuf>,

    /// Explicit favicon database path, overriding `<profile_dir>/favicons.sqlite`.
    ///
    /// Set via ZENMARKS_FAVICONS_DB environment variable.
    #[serde(default)]
    pub favicons_db: Option<PathBuf>,

    /// Directory for snapshots and materialized favicons (default: system temp dir).
    ///
    /// Set via ZENMARKS_SCRATCH_DIR environment variable.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Seconds a handed-over favicon file may live before the reaper removes it.
    ///
    /// Set via ZENMARKS_FAVICON_TTL_SECS environment variable.
    #[serde(default = "default_favicon_ttl_secs")]
    pub favicon_ttl_secs: u64,

    /// Upper bound on materialized favicon files kept in the scratch dir.
    ///
    /// Set via ZENMARKS_FAVICON_MAX_FILES environment variable.
    #[serde(default = "default_favicon_max_files")]
    pub favicon_max_files: usize,
}

fn default_profile_dir() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/"));
    home.join(".var/app/app.zen_browser.zen/.zen/cr6uussi.Default (release)")
}

fn default_favicon_ttl_secs() -> u64 {
    3_600
}

fn default_favicon_max_files() -> usize {
    256
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile_dir: default_profile_dir(),
            bookmarks_db: None,
            favicons_db: None,
            scratch_dir: None,
            favicon_ttl_secs: default_favicon_ttl_secs(),
            favicon_max_files: default_favicon_max_files(),
        }
    }
}

/// Where the browser keeps the databases we read. Neither file needs to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub bookmarks_db: PathBuf,
    pub favicons_db: PathBuf,
}

impl SourceLocation {
    /// Standard layout of a Firefox-family profile directory.
    pub fn from_profile(profile_dir: impl AsRef<Path>) -> Self {
        let dir = profile_dir.as_ref();
        Self { bookmarks_db: dir.join(PLACES_DB), favicons_db: dir.join(FAVICONS_DB) }
    }
}

/// Bounds on how many handed-over favicon files may accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    pub max_age: Duration,
    pub max_files: usize,
}

impl AppConfig {
    /// Resolve the bookmark and favicon database paths.
    pub fn source_location(&self) -> SourceLocation {
        let profile = SourceLocation::from_profile(&self.profile_dir);
        SourceLocation {
            bookmarks_db: self.bookmarks_db.clone().unwrap_or(profile.bookmarks_db),
            favicons_db: self.favicons_db.clone().unwrap_or(profile.favicons_db),
        }
    }

    /// Scratch directory for snapshots and favicons.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Favicon retention policy for the reaper.
    pub fn retention(&self) -> Retention {
        Retention { max_age: Duration::from_secs(self.favicon_ttl_secs), max_files: self.favicon_max_files }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `ZENMARKS_`
    /// 2. TOML file from `ZENMARKS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ZENMARKS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("ZENMARKS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
