//! A byte channel over the raw bytes of a file.
//!
//! Tiles and strips are addressed by absolute offset and byte count. Before
//! decoding one of them, the channel is restricted to that region with
//! [`ByteChannel::set_region`]; reads past the end of the region fail with
//! [`ParseError::UnexpectedEof`].

use crate::error::{ParseError, Result, err};

/// A byte and bit reader over a region of a file.
#[derive(Debug, Clone)]
pub struct ByteChannel<'a> {
    data: &'a [u8],
    /// The bytes of the current region.
    region: &'a [u8],
    /// The absolute offset of the current region.
    region_start: usize,
    /// The position in bits, relative to the region start.
    bit_offset: usize,
}

impl<'a> ByteChannel<'a> {
    /// Create a new channel whose region covers all of `data`.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            region: data,
            region_start: 0,
            bit_offset: 0,
        }
    }

    /// Restrict reads to `len` bytes starting at the absolute offset `start`,
    /// and rewind to the start of that region.
    pub fn set_region(&mut self, start: usize, len: usize) -> Result<()> {
        let end = start
            .checked_add(len)
            .ok_or(ParseError::RegionOutOfBounds)?;
        self.region = self
            .data
            .get(start..end)
            .ok_or(ParseError::RegionOutOfBounds)?;
        self.region_start = start;
        self.bit_offset = 0;

        Ok(())
    }

    /// Read a single bit.
    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<u32> {
        let Some(&byte) = self.region.get(self.byte_pos()) else {
            return err!(ParseError::UnexpectedEof);
        };
        let shift = 7 - self.bit_pos();
        self.bit_offset += 1;

        Ok((byte as u32 >> shift) & 1)
    }

    /// Read up to 32 bits, most significant bit first.
    #[inline(always)]
    pub fn read_bits(&mut self, num_bits: usize) -> Result<u32> {
        debug_assert!(num_bits <= 32);

        let mut result = 0_u32;

        for i in (0..num_bits).rev() {
            result |= self.read_bit()? << i;
        }

        Ok(result)
    }

    /// Read up to 32 bits without advancing.
    #[inline(always)]
    pub fn peek_bits(&self, num_bits: usize) -> Result<u32> {
        self.clone().read_bits(num_bits)
    }

    /// Read a whole byte, skipping to the next byte boundary first.
    #[inline(always)]
    pub fn read_byte(&mut self) -> Result<u8> {
        self.align();

        let byte = *self
            .region
            .get(self.byte_pos())
            .ok_or(ParseError::UnexpectedEof)?;
        self.bit_offset += 8;

        Ok(byte)
    }

    /// Skip to the next byte boundary.
    #[inline(always)]
    pub fn align(&mut self) {
        let bit_pos = self.bit_pos();

        if !bit_pos.is_multiple_of(8) {
            self.bit_offset += 8 - bit_pos;
        }
    }

    /// Whether all bytes of the region have been read.
    #[inline(always)]
    pub fn at_end(&self) -> bool {
        self.byte_pos() >= self.region.len()
    }

    /// The current byte position, relative to the region start.
    #[inline(always)]
    pub fn byte_pos(&self) -> usize {
        self.bit_offset >> 3
    }

    /// The current bit within the current byte (0 is the most significant bit).
    #[inline(always)]
    pub fn bit_pos(&self) -> usize {
        self.bit_offset & 7
    }

    /// The absolute offset of the current byte in the underlying data.
    #[inline]
    pub fn absolute_pos(&self) -> usize {
        self.region_start + self.byte_pos()
    }
}
