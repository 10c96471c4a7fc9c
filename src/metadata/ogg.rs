//! Minimal Ogg page reader, enough to pull the Vorbis header packets.
//!
//! Page layout:
//! - Capture pattern "OggS" (4 bytes)
//! - Version, always 0 (1 byte)
//! - Header type: 0x01 continuation, 0x02 BOS, 0x04 EOS (1 byte)
//! - Granule position (8 bytes LE)
//! - Bitstream serial number (4 bytes LE)
//! - Page sequence number (4 bytes LE)
//! - CRC checksum (4 bytes LE, not verified here)
//! - Number of page segments (1 byte)
//! - Segment table (one lacing value per segment)
//!
//! A packet ends at the first lacing value below 255 and may span pages.
//! Pages from any logical stream other than the first one are skipped.

use std::collections::VecDeque;
use std::io::{self, Read};

pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

const PAGE_HEADER_LEN: usize = 27;
const HEADER_TYPE_CONTINUATION: u8 = 0x01;

#[derive(Debug, thiserror::Error)]
pub enum OggError {
    #[error("not an Ogg stream")]
    NotOgg,

    #[error("lost page sync at page {0}")]
    LostSync(u32),

    #[error("unsupported Ogg version {0}")]
    UnsupportedVersion(u8),

    #[error("stream ended inside a page or packet")]
    Truncated,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Parsed page header
#[derive(Debug, Clone)]
pub struct PageHeader {
    pub header_type: u8,
    pub granule_position: u64,
    pub serial: u32,
    pub sequence: u32,
    pub checksum: u32,
    pub lacing: Vec<u8>,
}

impl PageHeader {
    /// Total payload length described by the segment table
    pub fn body_len(&self) -> usize {
        self.lacing.iter().map(|&v| v as usize).sum()
    }

    pub fn is_continuation(&self) -> bool {
        self.header_type & HEADER_TYPE_CONTINUATION != 0
    }
}

/// Reassembles packets from a sequence of Ogg pages.
pub struct PacketReader<R> {
    inner: R,
    pages_read: u32,
    serial: Option<u32>,
    partial: Vec<u8>,
    ready: VecDeque<Vec<u8>>,
}

impl<R: Read> PacketReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pages_read: 0,
            serial: None,
            partial: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    /// Next complete packet of the first logical stream, or `None` at end of stream.
    pub fn next_packet(&mut self) -> Result<Option<Vec<u8>>, OggError> {
        loop {
            if let Some(packet) = self.ready.pop_front() {
                return Ok(Some(packet));
            }

            let Some(header) = self.read_page_header()? else {
                if self.partial.is_empty() {
                    return Ok(None);
                }
                return Err(OggError::Truncated);
            };

            let mut body = vec![0u8; header.body_len()];
            read_full(&mut self.inner, &mut body)?;

            if *self.serial.get_or_insert(header.serial) != header.serial {
                continue;
            }

            // A fresh page that is not marked as a continuation cannot finish
            // a packet left open by the previous page.
            if !header.is_continuation() && !self.partial.is_empty() {
                tracing::debug!(
                    page = header.sequence,
                    "Dropping unterminated packet before fresh page"
                );
                self.partial.clear();
            }

            let mut offset = 0;
            for &len in &header.lacing {
                let len = len as usize;
                self.partial.extend_from_slice(&body[offset..offset + len]);
                offset += len;
                if len < 255 {
                    self.ready.push_back(std::mem::take(&mut self.partial));
                }
            }
        }
    }

    fn read_page_header(&mut self) -> Result<Option<PageHeader>, OggError> {
        let mut fixed = [0u8; PAGE_HEADER_LEN];
        let filled = fill(&mut self.inner, &mut fixed)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < 4 || &fixed[0..4] != OGG_SIGNATURE {
            return Err(if self.pages_read == 0 {
                OggError::NotOgg
            } else {
                OggError::LostSync(self.pages_read)
            });
        }
        if filled < PAGE_HEADER_LEN {
            return Err(OggError::Truncated);
        }
        if fixed[4] != 0 {
            return Err(OggError::UnsupportedVersion(fixed[4]));
        }

        let le32 = |at: usize| u32::from_le_bytes([fixed[at], fixed[at + 1], fixed[at + 2], fixed[at + 3]]);
        let mut granule = [0u8; 8];
        granule.copy_from_slice(&fixed[6..14]);

        let mut lacing = vec![0u8; fixed[26] as usize];
        read_full(&mut self.inner, &mut lacing)?;

        self.pages_read += 1;

        Ok(Some(PageHeader {
            header_type: fixed[5],
            granule_position: u64::from_le_bytes(granule),
            serial: le32(14),
            sequence: le32(18),
            checksum: le32(22),
            lacing,
        }))
    }
}

/// Read until `buf` is full or the reader is exhausted; returns bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), OggError> {
    if fill(reader, buf)? < buf.len() {
        return Err(OggError::Truncated);
    }
    Ok(())
}
