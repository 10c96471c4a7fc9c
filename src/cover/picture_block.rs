//! Picture block decoding for Vorbis comments.
//!
//! Ogg Vorbis files embed artwork as a base64 `METADATA_BLOCK_PICTURE`
//! comment holding a FLAC-style picture block. All integers are big-endian:
//!
//! ```text
//! picture type        u32           (ignored)
//! MIME length L1      u32
//! MIME type           L1 bytes
//! description length  u32
//! description         L2 bytes      (ignored)
//! width, height, depth, colors  4 x u32  (ignored)
//! data length         u32           (read, not used to bound the data)
//! image data          everything to the end of the block
//! ```
//!
//! Taking every trailing byte as image data means a block whose declared
//! length disagrees with the remainder still decodes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::metadata::cursor::{ByteCursor, UnexpectedEnd};

/// Vorbis comment key carrying a picture block
pub const PICTURE_COMMENT_KEY: &str = "metadata_block_picture";

/// Width, height, colour depth, palette size
const DIMENSION_FIELDS_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum PictureBlockError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("truncated picture block: {0}")]
    Truncated(#[from] UnexpectedEnd),
}

/// A decoded picture block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureBlock {
    pub mime: String,
    /// Data length as written in the block; may disagree with `data.len()`
    pub declared_len: u32,
    pub data: Vec<u8>,
}

/// Parse a raw (already decoded) picture block.
pub fn parse_picture_block(block: &[u8]) -> Result<PictureBlock, PictureBlockError> {
    let mut cursor = ByteCursor::new(block);

    cursor.skip(4)?;
    let mime = String::from_utf8_lossy(cursor.read_prefixed_be()?).into_owned();
    cursor.read_prefixed_be()?;
    cursor.skip(DIMENSION_FIELDS_LEN)?;
    let declared_len = cursor.read_u32_be()?;
    let data = cursor.rest().to_vec();

    if declared_len as usize != data.len() {
        tracing::debug!(
            declared = declared_len,
            actual = data.len(),
            "Picture block length mismatch, using all trailing bytes"
        );
    }

    Ok(PictureBlock {
        mime,
        declared_len,
        data,
    })
}

/// Decode the base64 text of a picture comment, then parse it.
pub fn decode_picture_comment(text: &str) -> Result<PictureBlock, PictureBlockError> {
    let block = STANDARD.decode(text.trim())?;
    parse_picture_block(&block)
}
