//! Embedded cover art extraction.
//!
//! Artwork is looked up in the file's own tag container only:
//!
//! 1. **ID3v2** - the first attached picture (APIC) frame
//! 2. **Vorbis comments** - the first `METADATA_BLOCK_PICTURE` value, a
//!    base64 picture block decoded by hand (see [`picture_block`])
//!
//! Missing art is not an error: [`extract`] returns `None`. Malformed picture
//! blocks are logged and also yield `None`.

mod embedded;
pub mod picture_block;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::metadata::{ContainerKind, TagContainer, TagError};

pub use picture_block::{PictureBlock, PictureBlockError, parse_picture_block};

/// Image formats we can name a file for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
    Tiff,
    Unknown,
}

impl ImageKind {
    /// Kind from a declared MIME type, if it names a known format.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.to_ascii_lowercase();
        let subtype = mime.rsplit('/').next().unwrap_or(&mime);
        match subtype.trim() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Kind from the leading magic bytes.
    pub fn sniff(data: &[u8]) -> Self {
        match data {
            [0xFF, 0xD8, 0xFF, ..] => Self::Jpeg,
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Self::Png,
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Self::Gif,
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Self::Webp,
            [b'B', b'M', ..] => Self::Bmp,
            [b'I', b'I', b'*', 0x00, ..] | [b'M', b'M', 0x00, b'*', ..] => Self::Tiff,
            _ => Self::Unknown,
        }
    }

    /// File extension (without dot)
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Unknown => "bin",
        }
    }
}

/// Raw artwork bytes with their detected format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkBlob {
    pub data: Vec<u8>,
    pub kind: ImageKind,
}

/// Extract the embedded cover from an audio file.
///
/// Returns None when the file has no tag, no picture, or an undecodable one.
pub fn extract(path: &Path) -> Option<ArtworkBlob> {
    let kind = ContainerKind::from_path(path)?;
    match TagContainer::open(path, kind) {
        Ok(container) => {
            let blob = embedded::from_container(&container);
            if blob.is_none() {
                tracing::debug!(path = %path.display(), "No embedded artwork");
            }
            blob
        }
        Err(TagError::NoHeader) => {
            tracing::debug!(path = %path.display(), "No tag header, no artwork");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read artwork");
            None
        }
    }
}

/// Write artwork as `<audio stem>.<ext>` inside `out_dir`.
pub fn save(blob: &ArtworkBlob, audio_path: &Path, out_dir: &Path) -> io::Result<PathBuf> {
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());

    fs::create_dir_all(out_dir)?;
    let dest = out_dir.join(format!("{}.{}", stem, blob.kind.extension()));
    fs::write(&dest, &blob.data)?;

    tracing::debug!(path = %dest.display(), bytes = blob.data.len(), "Saved artwork");
    Ok(dest)
}
