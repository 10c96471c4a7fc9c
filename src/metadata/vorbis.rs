//! Vorbis comment header decoding.
//!
//! The comment header is the second packet of a Vorbis stream:
//!
//! ```text
//! "\x03vorbis"
//! vendor_length (u32 LE) + vendor string
//! comment_count (u32 LE)
//! comment_count x { length (u32 LE) + "KEY=value" }
//! framing bit
//! ```
//!
//! Keys are case-insensitive and stored lowercased. A key may repeat; values
//! keep their file order.

use std::io::Read;

use super::cursor::{ByteCursor, UnexpectedEnd};
use super::ogg::{OggError, PacketReader};

const IDENTIFICATION_MAGIC: &[u8] = b"\x01vorbis";
const COMMENT_MAGIC: &[u8] = b"\x03vorbis";

#[derive(Debug, thiserror::Error)]
pub enum VorbisError {
    #[error(transparent)]
    Ogg(#[from] OggError),

    #[error("first packet is not a Vorbis identification header")]
    NotVorbis,

    #[error("stream ends before the comment header")]
    MissingCommentHeader,

    #[error("malformed comment header: {0}")]
    Malformed(#[from] UnexpectedEnd),
}

/// Decoded Vorbis comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VorbisComments {
    vendor: String,
    entries: Vec<(String, String)>,
}

impl VorbisComments {
    /// Read the comment header from the start of an Ogg Vorbis stream.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, VorbisError> {
        let mut packets = PacketReader::new(reader);

        let ident = packets.next_packet()?.ok_or(VorbisError::NotVorbis)?;
        if !ident.starts_with(IDENTIFICATION_MAGIC) {
            return Err(VorbisError::NotVorbis);
        }

        let comments = packets
            .next_packet()?
            .ok_or(VorbisError::MissingCommentHeader)?;
        Self::parse(&comments)
    }

    /// Decode a comment header packet (including its `\x03vorbis` prefix).
    pub fn parse(packet: &[u8]) -> Result<Self, VorbisError> {
        let Some(body) = packet.strip_prefix(COMMENT_MAGIC) else {
            return Err(VorbisError::MissingCommentHeader);
        };

        let mut cursor = ByteCursor::new(body);
        let vendor = String::from_utf8_lossy(cursor.read_prefixed_le()?).into_owned();

        let count = cursor.read_u32_le()?;
        let mut entries = Vec::new();
        for _ in 0..count {
            let raw = cursor.read_prefixed_le()?;
            let text = String::from_utf8_lossy(raw);
            match text.split_once('=') {
                Some((key, value)) => {
                    entries.push((key.to_ascii_lowercase(), value.to_string()));
                }
                None => tracing::debug!(comment = %text, "Skipping comment without '='"),
            }
        }

        Ok(Self { vendor, entries })
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// All values for `key`, in file order
    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.get_all(key).next()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
