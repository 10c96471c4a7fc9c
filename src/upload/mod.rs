//! Upload orchestration: folder of audio files → catalog records.
//!
//! An album upload runs in one pass, in this order:
//!
//! 1. Discover audio files in the folder (non-recursive)
//! 2. Read metadata from each; files without tags are skipped
//! 3. Take album name and year from the first parsed file
//! 4. Stage that file's embedded artwork as the album cover
//! 5. Create the album
//! 6. Per track: resolve singers, stage audio, create lyric, create track
//!
//! Nothing is retried or rolled back. A failure at track K leaves the album
//! and tracks 1..K-1 in the catalog. Singer lookups are the only
//! deduplication; running the same folder twice creates a second album.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::{CatalogApi, CatalogError, NewAlbum, NewTrack};
use crate::cover;
use crate::metadata::{self, NormalizedMetadata};
use crate::scanner;
use crate::staging::{ContentStager, MediaReference, StageError};

/// Album id the catalog uses for tracks without an album
pub const SINGLE_ALBUM_ID: i64 = 0;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No supported audio files found in {0}")]
    NoAudioFiles(PathBuf),

    #[error("No metadata could be extracted from audio files in {0}")]
    NoMetadata(PathBuf),

    #[error("Failed to list {path}: {source}")]
    Discover {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to save artwork from {path}: {source}")]
    Artwork {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Stage(#[from] StageError),
}

/// A track created in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedTrack {
    pub track_id: i64,
    pub title: String,
    pub singer: String,
    /// Audio media token
    pub url: String,
    pub lyric_id: i64,
}

/// Result of a completed album upload
#[derive(Debug, Clone)]
pub struct AlbumSummary {
    pub album_id: i64,
    pub name: String,
    pub year: u32,
    /// Cover media token; empty when the album has no artwork
    pub cover: String,
    pub tracks: Vec<UploadedTrack>,
    /// Files found but skipped for lack of tags
    pub skipped: usize,
}

/// Result of a completed singles upload
#[derive(Debug, Clone)]
pub struct SinglesSummary {
    pub tracks: Vec<UploadedTrack>,
    pub skipped: usize,
}

/// Singer ids resolved during one run, keyed by exact artist string
type SingerCache = HashMap<String, i64>;

/// Drives the catalog and the stager for one upload at a time.
pub struct CatalogUploader<C> {
    catalog: C,
    stager: ContentStager,
}

impl<C: CatalogApi> CatalogUploader<C> {
    pub fn new(catalog: C, stager: ContentStager) -> Self {
        Self { catalog, stager }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn stager(&self) -> &ContentStager {
        &self.stager
    }

    /// Upload every tagged audio file in `folder` as one album.
    pub async fn upload_album(&self, folder: &Path) -> Result<AlbumSummary, UploadError> {
        let (parsed, skipped) = read_folder(folder)?;
        let Some(first) = parsed.first() else {
            return Err(UploadError::NoMetadata(folder.to_path_buf()));
        };

        let name = first.album.clone();
        let year = first.year();
        tracing::info!(album = %name, year, tracks = parsed.len(), "Uploading album");

        let cover = self
            .stage_cover(&first.file_path, &name)
            .await?
            .map(|r| r.token())
            .unwrap_or_default();

        let album_id = self
            .catalog
            .create_album(&NewAlbum {
                name: name.clone(),
                cover: cover.clone(),
                year,
            })
            .await?;
        tracing::info!(album_id, "Album created");

        let mut singers = SingerCache::new();
        let mut tracks = Vec::with_capacity(parsed.len());
        for (index, meta) in parsed.iter().enumerate() {
            tracing::info!(
                track = index + 1,
                of = parsed.len(),
                title = %meta.title,
                "Processing track"
            );
            let context = TrackContext {
                album_id,
                cover: &cover,
                year,
                album_text: &name,
            };
            let uploaded = self
                .upload_track(meta, context, &mut singers)
                .await
                .inspect_err(|e| {
                    tracing::error!(track = index + 1, title = %meta.title, error = %e, "Track upload failed");
                })?;
            tracks.push(uploaded);
        }

        Ok(AlbumSummary {
            album_id,
            name,
            year,
            cover,
            tracks,
            skipped,
        })
    }

    /// Upload every tagged audio file in `folder` as a standalone track.
    ///
    /// Each single carries its own artwork, year and album text.
    pub async fn upload_singles(&self, folder: &Path) -> Result<SinglesSummary, UploadError> {
        let (parsed, skipped) = read_folder(folder)?;
        if parsed.is_empty() {
            return Err(UploadError::NoMetadata(folder.to_path_buf()));
        }
        tracing::info!(tracks = parsed.len(), "Uploading singles");

        let mut singers = SingerCache::new();
        let mut tracks = Vec::with_capacity(parsed.len());
        for (index, meta) in parsed.iter().enumerate() {
            tracing::info!(
                track = index + 1,
                of = parsed.len(),
                title = %meta.title,
                "Processing single"
            );
            let cover = self
                .stage_cover(&meta.file_path, &meta.title)
                .await?
                .map(|r| r.token())
                .unwrap_or_default();
            let context = TrackContext {
                album_id: SINGLE_ALBUM_ID,
                cover: &cover,
                year: meta.year(),
                album_text: &meta.album,
            };
            let uploaded = self
                .upload_track(meta, context, &mut singers)
                .await
                .inspect_err(|e| {
                    tracing::error!(track = index + 1, title = %meta.title, error = %e, "Single upload failed");
                })?;
            tracks.push(uploaded);
        }

        Ok(SinglesSummary { tracks, skipped })
    }

    /// Extract artwork into scratch space and move it into the store.
    async fn stage_cover(
        &self,
        audio_path: &Path,
        hint: &str,
    ) -> Result<Option<MediaReference>, UploadError> {
        let Some(blob) = cover::extract(audio_path) else {
            tracing::info!(path = %audio_path.display(), "No embedded artwork");
            return Ok(None);
        };

        let scratch = self.stager.scratch_dir();
        let saved = cover::save(&blob, audio_path, &scratch).map_err(|source| {
            UploadError::Artwork {
                path: audio_path.to_path_buf(),
                source,
            }
        })?;

        let reference = match self.stager.stage_artwork(&saved, hint).await {
            Ok(reference) => reference,
            Err(e) => {
                discard_scratch(&saved);
                return Err(e.into());
            }
        };
        tracing::info!(key = %reference.relative_path, "Cover staged");
        Ok(Some(reference))
    }

    async fn upload_track(
        &self,
        meta: &NormalizedMetadata,
        context: TrackContext<'_>,
        singers: &mut SingerCache,
    ) -> Result<UploadedTrack, UploadError> {
        for artist in &meta.artists {
            let singer_id = self.resolve_singer(artist, singers).await?;
            tracing::debug!(singer = %artist, singer_id, "Singer resolved");
        }
        let singer = meta.artist_display();

        let audio = self.stager.stage_audio(&meta.file_path).await?;

        let lyric_id = if meta.has_lyrics() {
            self.catalog.create_lyric(&meta.lyric_text).await?
        } else {
            0
        };

        let url = audio.token();
        let track_id = self
            .catalog
            .create_track(&NewTrack {
                name: meta.title.clone(),
                singer: singer.clone(),
                album: context.album_id,
                cover: context.cover.to_string(),
                url: url.clone(),
                lyric: lyric_id,
                duration: meta.whole_seconds(),
                year: context.year,
                track_number: meta.track_number_value(),
                genre: meta.genre.clone(),
                album_text: context.album_text.to_string(),
            })
            .await?;
        tracing::info!(track_id, title = %meta.title, "Track created");

        Ok(UploadedTrack {
            track_id,
            title: meta.title.clone(),
            singer,
            url,
            lyric_id,
        })
    }

    /// Find a singer by exact (case-insensitive) name, creating it if absent.
    async fn resolve_singer(
        &self,
        name: &str,
        cache: &mut SingerCache,
    ) -> Result<i64, CatalogError> {
        if let Some(&id) = cache.get(name) {
            return Ok(id);
        }

        let existing = self
            .catalog
            .search_singers(name)
            .await?
            .into_iter()
            .find(|s| s.name.to_lowercase() == name.to_lowercase());

        let id = match existing {
            Some(singer) => singer.id,
            None => {
                let id = self.catalog.create_singer(name, "").await?;
                tracing::info!(singer = %name, singer_id = id, "Singer created");
                id
            }
        };

        cache.insert(name.to_string(), id);
        Ok(id)
    }
}

/// Values shared by every track of one upload
#[derive(Debug, Clone, Copy)]
struct TrackContext<'a> {
    album_id: i64,
    cover: &'a str,
    year: u32,
    album_text: &'a str,
}

/// Discover and parse a folder; returns the parsed tracks and the skip count.
///
/// Fails before any side effect when nothing usable is found.
/// Best-effort removal of a scratch file left behind by a failed staging.
fn discard_scratch(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed scratch artwork"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch artwork");
        }
    }
}

fn read_folder(folder: &Path) -> Result<(Vec<NormalizedMetadata>, usize), UploadError> {
    let files =
        scanner::discover_audio_files(folder).map_err(|source| UploadError::Discover {
            path: folder.to_path_buf(),
            source,
        })?;
    if files.is_empty() {
        return Err(UploadError::NoAudioFiles(folder.to_path_buf()));
    }
    tracing::info!(folder = %folder.display(), files = files.len(), "Found audio files");

    let parsed: Vec<NormalizedMetadata> = files.iter().filter_map(|f| metadata::read(f)).collect();
    let skipped = files.len() - parsed.len();
    if skipped > 0 {
        tracing::info!(skipped, "Skipped files without metadata");
    }
    Ok((parsed, skipped))
}
