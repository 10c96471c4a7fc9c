//! Test utilities and fixtures for sonora tests.
//!
//! Builders for the byte layouts the readers understand (Ogg pages, Vorbis
//! headers, FLAC-style picture blocks, ID3-tagged MP3 files), plus a few
//! mock factories and a temporary database.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{write_ogg, temp_db};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let path = write_ogg(dir.path(), "song.ogg", &[("title", "Song")]);
//!     let (pool, _db_dir) = temp_db().await;
//!     // ... test logic
//! }
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use id3::{Tag, Version};
use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::metadata::{ContainerKind, NormalizedMetadata};

/// Vendor string written into every fixture comment header
pub const TEST_VENDOR: &str = "sonora test vendor";

/// Serial number of the single logical stream in fixture Ogg files
pub const TEST_SERIAL: u32 = 0x5a0a_0001;

/// Smallest byte prefix recognized as JPEG, padded to look like a file
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0xFF, 0xD9,
];

/// PNG signature plus a few bytes
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

/// Lay out packets as a single-stream Ogg bitstream.
///
/// Pages hold at most 255 segments. Follow-on pages of a spanning packet
/// carry the continuation flag. CRCs are left as zero.
pub fn ogg_stream(packets: &[Vec<u8>]) -> Vec<u8> {
    let mut segments: Vec<&[u8]> = Vec::new();
    for packet in packets {
        segments.extend(packet.chunks(255));
        if packet.len() % 255 == 0 {
            segments.push(&[]);
        }
    }

    let mut out = Vec::new();
    let mut continued = false;
    for (sequence, page) in segments.chunks(255).enumerate() {
        let mut header_type = if continued { 0x01 } else { 0x00 };
        if sequence == 0 {
            header_type |= 0x02;
        }

        out.extend_from_slice(b"OggS");
        out.push(0);
        out.push(header_type);
        out.extend_from_slice(&0u64.to_le_bytes());
        out.extend_from_slice(&TEST_SERIAL.to_le_bytes());
        out.extend_from_slice(&(sequence as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.push(page.len() as u8);
        out.extend(page.iter().map(|seg| seg.len() as u8));
        for seg in page {
            out.extend_from_slice(seg);
        }

        continued = page.last().is_some_and(|seg| seg.len() == 255);
    }
    out
}

/// A Vorbis comment header packet (with framing byte).
pub fn comment_packet(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut packet = b"\x03vorbis".to_vec();
    push_le_prefixed(&mut packet, TEST_VENDOR.as_bytes());
    packet.extend_from_slice(&(pairs.len() as u32).to_le_bytes());
    for (key, value) in pairs {
        push_le_prefixed(&mut packet, format!("{key}={value}").as_bytes());
    }
    packet.push(1);
    packet
}

fn push_le_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
}

fn identification_packet() -> Vec<u8> {
    let mut packet = b"\x01vorbis".to_vec();
    packet.extend_from_slice(&0u32.to_le_bytes()); // version
    packet.push(2); // channels
    packet.extend_from_slice(&44_100u32.to_le_bytes());
    packet.extend_from_slice(&0i32.to_le_bytes());
    packet.extend_from_slice(&128_000i32.to_le_bytes());
    packet.extend_from_slice(&0i32.to_le_bytes());
    packet.push(0xB8);
    packet.push(1);
    packet
}

/// A complete Ogg Vorbis header stream: identification, comments, setup.
pub fn ogg_vorbis_bytes(pairs: &[(&str, &str)]) -> Vec<u8> {
    ogg_stream(&[
        identification_packet(),
        comment_packet(pairs),
        b"\x05vorbis\x00".to_vec(),
    ])
}

/// Write an Ogg Vorbis fixture into `dir`.
pub fn write_ogg(dir: &Path, name: &str, pairs: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, ogg_vorbis_bytes(pairs)).expect("Failed to write ogg fixture");
    path
}

/// Write an MP3 fixture into `dir`: an ID3v2.4 tag followed by padding.
pub fn write_mp3(dir: &Path, name: &str, build: impl FnOnce(&mut Tag)) -> PathBuf {
    let mut tag = Tag::new();
    build(&mut tag);

    let mut bytes = Vec::new();
    tag.write_to(&mut bytes, Version::Id3v24)
        .expect("Failed to encode ID3 tag");
    bytes.extend(std::iter::repeat_n(0u8, 1024));

    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write mp3 fixture");
    path
}

/// A binary picture block (big-endian fields).
pub fn picture_block(mime: &str, description: &str, data: &[u8]) -> Vec<u8> {
    let mut block = Vec::new();
    block.extend_from_slice(&3u32.to_be_bytes()); // front cover
    block.extend_from_slice(&(mime.len() as u32).to_be_bytes());
    block.extend_from_slice(mime.as_bytes());
    block.extend_from_slice(&(description.len() as u32).to_be_bytes());
    block.extend_from_slice(description.as_bytes());
    for dimension in [500u32, 500, 24, 0] {
        block.extend_from_slice(&dimension.to_be_bytes());
    }
    block.extend_from_slice(&(data.len() as u32).to_be_bytes());
    block.extend_from_slice(data);
    block
}

/// Picture block encoded the way Vorbis comments carry it.
pub fn picture_block_base64(mime: &str, description: &str, data: &[u8]) -> String {
    STANDARD.encode(picture_block(mime, description, data))
}

/// Creates a mock NormalizedMetadata with sensible defaults.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let meta = NormalizedMetadata {
///     title: "Custom".to_string(),
///     ..mock_metadata("/music/a.mp3", &["Artist"])
/// };
/// ```
pub fn mock_metadata(path: &str, artists: &[&str]) -> NormalizedMetadata {
    NormalizedMetadata {
        title: "Test Track".to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        album: "Test Album".to_string(),
        genre: "Test Genre".to_string(),
        track_number: "1".to_string(),
        duration_seconds: Some(180.0),
        date: "2023".to_string(),
        file_path: PathBuf::from(path),
        file_size: 1024,
        format: ContainerKind::Mp3,
        lyric_text: String::new(),
    }
}

/// Creates a temporary media database with migrations applied.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("media.db");

    let pool = crate::db::init_db(&crate::db::db_url(Some(&db_path)))
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::cursor::ByteCursor;

    #[test]
    fn test_ogg_stream_page_headers() {
        let bytes = ogg_stream(&[b"abc".to_vec()]);
        assert_eq!(&bytes[0..4], b"OggS");
        assert_eq!(bytes[5], 0x02);
        assert_eq!(bytes[26], 1);
        assert_eq!(bytes[27], 3);
        assert_eq!(&bytes[28..], b"abc");
    }

    #[test]
    fn test_picture_block_layout() {
        let block = picture_block("image/png", "", PNG_BYTES);
        let mut cursor = ByteCursor::new(&block);
        assert_eq!(cursor.read_u32_be().unwrap(), 3);
        assert_eq!(cursor.read_prefixed_be().unwrap(), b"image/png");
        assert_eq!(cursor.read_prefixed_be().unwrap(), b"");
        cursor.skip(16).unwrap();
        assert_eq!(cursor.read_prefixed_be().unwrap(), PNG_BYTES);
        assert_eq!(cursor.remaining(), 0);
    }

    #[tokio::test]
    async fn test_temp_db_creates_working_database() {
        let (pool, _dir) = temp_db().await;
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
