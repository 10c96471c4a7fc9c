//! Audio file metadata reading.
//!
//! Two tag containers are supported, selected by file extension:
//! - MP3 files carry ID3v2 frames (read with the `id3` crate)
//! - Ogg files carry Vorbis comments (read with our own Ogg packet reader)
//!
//! Both normalize into one [`NormalizedMetadata`]. A file without a tag
//! header is not an error: [`read`] returns `None` and logs at debug level.
//! Stream properties (duration) come from lofty and are optional.

pub mod artists;
pub mod cursor;
pub mod frames;
pub mod ogg;
pub mod vorbis;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub use artists::{UNKNOWN_ARTIST, resolve_artists, split_artists};
pub use vorbis::{VorbisComments, VorbisError};

/// Placeholder for any missing scalar field.
pub const UNKNOWN: &str = "Unknown";

/// Vorbis keys that may carry lyrics, consulted top to bottom.
const VORBIS_LYRIC_KEYS: &[&str] = &["lyrics", "unsyncedlyrics"];

/// Supported container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// MP3 with ID3v2 frames
    Mp3,
    /// Ogg Vorbis with Vorbis comments
    Ogg,
}

impl ContainerKind {
    /// All supported kinds, in discovery order
    pub const ALL: [ContainerKind; 2] = [ContainerKind::Mp3, ContainerKind::Ogg];

    /// Detect the container from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Mp3),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "MP3",
            Self::Ogg => "OGG",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from reading a tag container.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The file has no recognizable tag header. Not a fault.
    #[error("no tag header")]
    NoHeader,

    #[error("unsupported file type: {0}")]
    Unsupported(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),

    #[error("Vorbis error: {0}")]
    Vorbis(#[from] VorbisError),
}

/// One canonical metadata record per audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMetadata {
    pub title: String,
    /// Trimmed, non-empty, in tag order. Never empty.
    pub artists: Vec<String>,
    pub album: String,
    pub genre: String,
    /// Numeric prefix of the track field (before any `/`)
    pub track_number: String,
    pub duration_seconds: Option<f64>,
    /// Raw date text; may or may not be a bare year
    pub date: String,
    pub file_path: PathBuf,
    pub file_size: u64,
    pub format: ContainerKind,
    /// Empty when the tag carries no lyrics
    pub lyric_text: String,
}

impl NormalizedMetadata {
    /// Artists joined for display and for the catalog's singer field
    pub fn artist_display(&self) -> String {
        self.artists.join("; ")
    }

    /// Duration as `MM:SS`, or "Unknown"
    pub fn duration_display(&self) -> String {
        match self.duration_seconds {
            Some(secs) => {
                let secs = secs.max(0.0) as u64;
                format!("{:02}:{:02}", secs / 60, secs % 60)
            }
            None => UNKNOWN.to_string(),
        }
    }

    /// Year, when the date field is all digits; 0 otherwise
    pub fn year(&self) -> u32 {
        parse_digits(&self.date).unwrap_or(0)
    }

    /// Track number, when the field is all digits; 0 otherwise
    pub fn track_number_value(&self) -> u32 {
        parse_digits(&self.track_number).unwrap_or(0)
    }

    /// Duration truncated to whole seconds; 0 when unknown
    pub fn whole_seconds(&self) -> u64 {
        self.duration_seconds
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.trunc() as u64)
            .unwrap_or(0)
    }

    pub fn has_lyrics(&self) -> bool {
        !self.lyric_text.is_empty()
    }
}

impl fmt::Display for NormalizedMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title:        {}", self.title)?;
        writeln!(f, "Track Number: {}", self.track_number)?;
        writeln!(f, "Album:        {}", self.album)?;
        writeln!(f, "Artist:       {}", self.artist_display())?;
        writeln!(f, "Genre:        {}", self.genre)?;
        writeln!(f, "Duration:     {}", self.duration_display())?;
        write!(f, "Date:         {}", self.date)
    }
}

/// Parse a string made only of ASCII digits.
pub fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Scalar fields and where each container keeps them.
#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Album,
    Genre,
    Date,
    TrackNumber,
}

impl Field {
    fn id3_frames(self) -> &'static [&'static str] {
        match self {
            Field::Title => &["TIT2"],
            Field::Album => &["TALB"],
            Field::Genre => &["TCON"],
            Field::Date => &["TDRC", "TYER"],
            Field::TrackNumber => &["TRCK"],
        }
    }

    fn vorbis_key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Album => "album",
            Field::Genre => "genre",
            Field::Date => "date",
            Field::TrackNumber => "tracknumber",
        }
    }
}

/// A parsed tag container.
pub enum TagContainer {
    Id3(id3::Tag),
    Vorbis(VorbisComments),
}

impl TagContainer {
    /// Read the container for `kind` from `path`.
    ///
    /// Returns [`TagError::NoHeader`] when the file has no tag header at all.
    pub fn open(path: &Path, kind: ContainerKind) -> Result<Self, TagError> {
        match kind {
            ContainerKind::Mp3 => match id3::Tag::read_from_path(path) {
                Ok(tag) => Ok(Self::Id3(tag)),
                Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Err(TagError::NoHeader),
                Err(e) => Err(TagError::Id3(e)),
            },
            ContainerKind::Ogg => {
                let file = File::open(path)?;
                match VorbisComments::read_from(BufReader::new(file)) {
                    Ok(comments) => Ok(Self::Vorbis(comments)),
                    Err(VorbisError::Ogg(ogg::OggError::NotOgg)) => Err(TagError::NoHeader),
                    Err(e) => Err(TagError::Vorbis(e)),
                }
            }
        }
    }

    fn field(&self, field: Field) -> Option<String> {
        match self {
            Self::Id3(tag) => frames::first_text_frame(tag, field.id3_frames()),
            Self::Vorbis(comments) => comments.get_first(field.vorbis_key()).map(str::to_string),
        }
    }

    fn artists(&self) -> Vec<String> {
        match self {
            Self::Id3(tag) => {
                let raw = frames::text_frame(tag, "TPE1");
                resolve_artists(raw.as_deref())
            }
            Self::Vorbis(comments) => resolve_artists(comments.get_all("artist")),
        }
    }

    fn lyrics(&self) -> Option<String> {
        match self {
            Self::Id3(tag) => frames::lyrics(tag),
            Self::Vorbis(comments) => VORBIS_LYRIC_KEYS
                .iter()
                .flat_map(|key| comments.get_all(key))
                .find(|text| !text.trim().is_empty())
                .map(str::to_string),
        }
    }
}

/// Read and normalize metadata, treating every failure as absence.
///
/// Missing tag headers are logged at debug level; any other failure is
/// logged as a warning. Neither is propagated.
pub fn read(path: &Path) -> Option<NormalizedMetadata> {
    match try_read(path) {
        Ok(meta) => Some(meta),
        Err(TagError::NoHeader) => {
            tracing::debug!(path = %path.display(), "No tag header");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read metadata");
            None
        }
    }
}

/// Read and normalize metadata, surfacing the reason for failure.
pub fn try_read(path: &Path) -> Result<NormalizedMetadata, TagError> {
    let kind =
        ContainerKind::from_path(path).ok_or_else(|| TagError::Unsupported(path.to_path_buf()))?;
    let container = TagContainer::open(path, kind)?;
    let file_size = std::fs::metadata(path)?.len();

    let text = |field: Field| container.field(field).unwrap_or_else(|| UNKNOWN.to_string());

    let track_number = container
        .field(Field::TrackNumber)
        .map(|raw| raw.split('/').next().unwrap_or_default().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Ok(NormalizedMetadata {
        title: text(Field::Title),
        artists: container.artists(),
        album: text(Field::Album),
        genre: text(Field::Genre),
        track_number,
        duration_seconds: stream_duration(path),
        date: text(Field::Date),
        file_path: path.to_path_buf(),
        file_size,
        format: kind,
        lyric_text: container.lyrics().unwrap_or_default(),
    })
}

/// Stream duration in seconds, if the audio properties can be read.
fn stream_duration(path: &Path) -> Option<f64> {
    let tagged_file = match Probe::open(path).and_then(|p| p.read()) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No stream properties");
            return None;
        }
    };
    Some(tagged_file.properties().duration().as_secs_f64())
}
