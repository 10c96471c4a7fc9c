//! Bounds-checked reader over an in-memory byte slice.
//!
//! Shared by the Vorbis comment decoder (little-endian lengths) and the
//! picture block decoder (big-endian lengths).

/// Attempted to read past the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected end of data at offset {offset}: needed {needed} bytes, {available} available")]
pub struct UnexpectedEnd {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], UnexpectedEnd> {
        if count > self.remaining() {
            return Err(UnexpectedEnd {
                offset: self.pos,
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize) -> Result<(), UnexpectedEnd> {
        self.read_bytes(count).map(|_| ())
    }

    /// Everything from the current position to the end of the buffer
    pub fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..];
        self.pos = self.data.len();
        bytes
    }

    pub fn read_u32_le(&mut self) -> Result<u32, UnexpectedEnd> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, UnexpectedEnd> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a length-prefixed byte run, the length stored as a little-endian u32
    pub fn read_prefixed_le(&mut self) -> Result<&'a [u8], UnexpectedEnd> {
        let len = self.read_u32_le()? as usize;
        self.read_bytes(len)
    }

    /// Read a length-prefixed byte run, the length stored as a big-endian u32
    pub fn read_prefixed_be(&mut self) -> Result<&'a [u8], UnexpectedEnd> {
        let len = self.read_u32_be()? as usize;
        self.read_bytes(len)
    }
}
