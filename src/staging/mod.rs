//! Content staging into the sharded store.
//!
//! Every artifact gets a fresh UUID v4. The first two and next two hex
//! characters of its simple form name a two-level shard directory:
//!
//! ```text
//! <root>/
//!   .staging/            scratch space (extracted artwork before staging)
//!   3f/
//!     a2/
//!       Night Drive.jpg  artwork, renamed after the album
//!       01 - Intro.mp3   audio, original file name
//! ```
//!
//! Artwork is moved into place; audio is copied and the source left alone.
//! With a media store configured, each placed file is also registered as a
//! `media` row and referenced by its UUID; without one, by its relative path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::config::StorageConfig;

/// Scratch directory name under the storage root
pub const SCRATCH_DIR: &str = ".staging";

/// Hint used when an album name sanitizes to nothing
const FALLBACK_ARTWORK_NAME: &str = "cover";

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("failed to register {key} in media store: {source}")]
    Register {
        key: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to open media store: {0}")]
    Store(#[from] sqlx::Error),
}

impl StageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Two-level shard directory derived from an identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardPath {
    pub outer: String,
    pub inner: String,
}

impl ShardPath {
    /// Relative key for `file_name` inside this shard, `/`-separated
    pub fn key(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.outer, self.inner, file_name)
    }

    /// Absolute shard directory under `root`
    pub fn dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.outer).join(&self.inner)
    }
}

/// Shard for an identifier: hex chars `[0..2]` and `[2..4]`.
pub fn shard_for(id: &Uuid) -> ShardPath {
    let hex = id.simple().to_string();
    ShardPath {
        outer: hex[0..2].to_string(),
        inner: hex[2..4].to_string(),
    }
}

/// Opaque handle for a staged artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub id: Uuid,
    /// `xx/yy/<file name>`
    pub relative_path: String,
    /// Whether a media row was written for this artifact
    pub registered: bool,
}

impl MediaReference {
    /// The string sent to the catalog for this artifact.
    pub fn token(&self) -> String {
        if self.registered {
            self.id.to_string()
        } else {
            self.relative_path.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Move,
    Copy,
}

/// Places artifacts under the storage root and optionally registers them.
pub struct ContentStager {
    root: PathBuf,
    store: Option<SqlitePool>,
}

impl ContentStager {
    /// Stager without a media store; references are relative paths.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            store: None,
        }
    }

    /// Stager that registers every artifact in `store`.
    pub fn with_store(root: impl Into<PathBuf>, store: SqlitePool) -> Self {
        Self {
            root: root.into(),
            store: Some(store),
        }
    }

    /// Build from configuration, opening the media store if one is set.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StageError> {
        match &config.media_db {
            Some(db_path) => {
                let pool = crate::db::init_db(&crate::db::db_url(Some(db_path))).await?;
                tracing::debug!(path = %db_path.display(), "Media store opened");
                Ok(Self::with_store(&config.root, pool))
            }
            None => Ok(Self::new(&config.root)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Scratch space for files that are about to be staged
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(SCRATCH_DIR)
    }

    /// Move an artwork file into the store, renamed after `album_hint`.
    pub async fn stage_artwork(
        &self,
        source: &Path,
        album_hint: &str,
    ) -> Result<MediaReference, StageError> {
        let mut name = sanitize_filename(album_hint.trim());
        if name.is_empty() {
            name = FALLBACK_ARTWORK_NAME.to_string();
        }
        if let Some(ext) = source.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        self.place(source, &name, Placement::Move).await
    }

    /// Copy an audio file into the store under its own file name.
    pub async fn stage_audio(&self, source: &Path) -> Result<MediaReference, StageError> {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| StageError::NoFileName(source.to_path_buf()))?;
        self.place(source, &name, Placement::Copy).await
    }

    async fn place(
        &self,
        source: &Path,
        file_name: &str,
        placement: Placement,
    ) -> Result<MediaReference, StageError> {
        let id = Uuid::new_v4();
        let shard = shard_for(&id);
        let dir = shard.dir_in(&self.root);
        fs::create_dir_all(&dir).map_err(|e| StageError::io(&dir, e))?;

        let dest = dir.join(file_name);
        match placement {
            Placement::Move => move_file(source, &dest)?,
            Placement::Copy => {
                fs::copy(source, &dest).map_err(|e| StageError::io(source, e))?;
            }
        }

        let key = shard.key(file_name);
        let registered = match &self.store {
            Some(pool) => {
                crate::db::insert_media(pool, &id.to_string(), &key)
                    .await
                    .map_err(|source| StageError::Register {
                        key: key.clone(),
                        source,
                    })?;
                true
            }
            None => false,
        };

        tracing::debug!(
            source = %source.display(),
            key = %key,
            registered,
            "Staged artifact"
        );

        Ok(MediaReference {
            id,
            relative_path: key,
            registered,
        })
    }
}

/// Rename, falling back to copy + remove across devices.
fn move_file(source: &Path, dest: &Path) -> Result<(), StageError> {
    if fs::rename(source, dest).is_err() {
        fs::copy(source, dest).map_err(|e| StageError::io(source, e))?;
        fs::remove_file(source).map_err(|e| StageError::io(source, e))?;
    }
    Ok(())
}

/// Sanitize a string for use as a filename
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            _ => c,
        })
        .collect()
}
