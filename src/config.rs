//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\sonora\config.toml
//! - macOS: ~/Library/Application Support/sonora/config.toml
//! - Linux: ~/.config/sonora/config.toml
//!
//! A different file can be given with `--config`. Individual values can be
//! overridden from the command line or environment (see [`Overrides`]).
//! The loaded [`Config`] is passed by value into the catalog client and the
//! content stager; nothing reads configuration from global state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote catalog service settings
    pub catalog: CatalogConfig,

    /// Content store settings
    pub storage: StorageConfig,
}

/// Remote catalog service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Endpoint paths per entity family
    pub endpoints: Endpoints,

    /// Attach an `Idempotency-Key` header to create calls.
    ///
    /// Off by default: the pipeline's historical behaviour is duplicate-prone.
    pub idempotency_keys: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            endpoints: Endpoints::default(),
            idempotency_keys: false,
        }
    }
}

/// Endpoint paths, relative to [`CatalogConfig::base_url`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// SearchSinger / CreateSinger
    pub singer: String,
    /// CreateAlbum
    pub album: String,
    /// CreateTrack / CreateLyric
    pub track: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            singer: "/singer".to_string(),
            album: "/album".to_string(),
            track: "/track".to_string(),
        }
    }
}

/// Content store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory holding the `xx/yy/` shard tree
    pub root: PathBuf,

    /// SQLite file for media rows. When unset, references are relative paths.
    pub media_db: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("output"),
            media_db: None,
        }
    }
}

/// Values supplied on the command line or through the environment.
///
/// Each `Some` wins over the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub storage_root: Option<PathBuf>,
    pub media_db: Option<PathBuf>,
}

impl Config {
    /// Apply command-line/environment overrides on top of this config
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.catalog.base_url = base_url;
        }
        if let Some(root) = overrides.storage_root {
            self.storage.root = root;
        }
        if let Some(db) = overrides.media_db {
            self.storage.media_db = Some(db);
        }
        self
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sonora"))
}

/// Get the full path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from `path`, or from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load(path: Option<&Path>) -> Config {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
