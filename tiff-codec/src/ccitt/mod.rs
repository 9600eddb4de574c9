//! Modified Huffman run-length decoding (ITU-T T.4, one-dimensional).
//!
//! A coded line is a sequence of alternating white and black runs, starting
//! with white. Each run is coded as zero or more make-up codes (multiples of
//! 64) followed by exactly one terminating code (0 to 63).

mod tables;
mod tree;

pub use tree::{BLACK_TREE, HuffmanTree, WHITE_TREE};

use crate::channel::ByteChannel;
use crate::error::{ConfigError, DecodeError, HuffmanError, Result, bail};
use crate::log::{ltrace, lwarn};

/// The color of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// A white run.
    White,
    /// A black run.
    Black,
}

impl Color {
    /// The other color.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The decoding tree for runs of this color.
    #[inline]
    pub fn tree(self) -> &'static HuffmanTree {
        match self {
            Self::White => &WHITE_TREE,
            Self::Black => &BLACK_TREE,
        }
    }
}

/// Decodes runs of alternating colors.
#[derive(Debug, Clone)]
pub struct RunDecoder {
    color: Color,
}

impl Default for RunDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RunDecoder {
    /// Create a new decoder, starting with a white run.
    pub fn new() -> Self {
        Self {
            color: Color::White,
        }
    }

    /// The color of the next run.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Start a new coded line, which always begins with a white run.
    #[inline]
    pub fn start_line(&mut self) {
        self.color = Color::White;
    }

    /// Decode the next run length.
    ///
    /// The color only changes once the run is complete, so a failed call
    /// leaves it untouched.
    #[inline]
    pub fn next_run_length(&mut self, channel: &mut ByteChannel<'_>) -> Result<u32> {
        let run = self.color.tree().decode_run(channel)?;
        self.color = self.color.opposite();

        Ok(run)
    }
}

/// Settings for decoding a strip of CCITT RLE (TIFF compression 2) data.
#[derive(Copy, Clone, Debug)]
pub struct RleSettings {
    /// The number of pixels per row.
    pub columns: u32,
    /// The number of rows.
    pub rows: u32,
    /// Whether black pixels are stored as 1 bits (`WhiteIsZero`). Otherwise,
    /// white pixels are 1 bits (`BlackIsZero`).
    pub black_is_1: bool,
}

impl RleSettings {
    /// The number of bytes of one packed output row.
    pub fn row_bytes(&self) -> usize {
        (self.columns as usize).div_ceil(8)
    }
}

/// Decode a whole CCITT RLE strip into packed rows of 1-bit pixels.
///
/// Each output row is padded to a whole byte.
pub fn decode_rle(data: &[u8], settings: &RleSettings) -> Result<Vec<u8>> {
    let mut channel = ByteChannel::new(data);
    decode_rle_region(&mut channel, settings)
}

/// Like [`decode_rle`], but reads from the current region of a channel.
pub fn decode_rle_region(channel: &mut ByteChannel<'_>, settings: &RleSettings) -> Result<Vec<u8>> {
    if settings.columns == 0 {
        bail!(ConfigError::InvalidGeometry);
    }

    let row_bytes = settings.row_bytes();
    let len = row_bytes
        .checked_mul(settings.rows as usize)
        .ok_or(DecodeError::Overflow)?;
    let mut out = vec![0; len];
    let mut decoder = RunDecoder::new();

    for (y, row) in out.chunks_exact_mut(row_bytes).enumerate() {
        decode_line(&mut decoder, channel, row, settings)?;
        // Every coded line starts on a byte boundary.
        channel.align();

        ltrace!("decoded row {}, now at byte {}", y, channel.absolute_pos());
    }

    Ok(out)
}

/// Decode one coded line into a zeroed, packed row.
fn decode_line(
    decoder: &mut RunDecoder,
    channel: &mut ByteChannel<'_>,
    row: &mut [u8],
    settings: &RleSettings,
) -> Result<()> {
    let columns = settings.columns as usize;
    let mut x = 0;

    decoder.start_line();

    while x < columns {
        let color = decoder.color();
        let run = decoder.next_run_length(channel)? as usize;

        let Some(end) = x.checked_add(run).filter(|&end| end <= columns) else {
            lwarn!("run of {run} pixels at column {x} exceeds row width {columns}");

            bail!(HuffmanError::LineOverflow);
        };

        if (color == Color::Black) == settings.black_is_1 {
            set_bits(row, x, end);
        }

        x = end;
    }

    Ok(())
}

/// Set the bits `start..end` of a packed row, MSB first.
fn set_bits(row: &mut [u8], start: usize, end: usize) {
    let mut x = start;

    while x < end && !x.is_multiple_of(8) {
        row[x / 8] |= 0x80 >> (x % 8);
        x += 1;
    }

    let full_end = end - (end - x) % 8;
    row[x / 8..full_end / 8].fill(0xFF);
    x = full_end;

    while x < end {
        row[x / 8] |= 0x80 >> (x % 8);
        x += 1;
    }
}
