//! Resolving TIFF sample descriptions into concrete numeric types.

use crate::error::{ConfigError, Result, bail};
use crate::log::lwarn;

/// The interpretation of a sample, as given by the TIFF `SampleFormat` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// Unsigned integer data.
    #[default]
    Unsigned,
    /// Two's complement signed integer data.
    Signed,
    /// IEEE floating point data.
    Float,
}

impl SampleFormat {
    /// Resolve the value of a `SampleFormat` tag.
    ///
    /// "Undefined" data (4) is treated like unsigned integers.
    pub fn from_tag(value: u16) -> Result<Self> {
        Ok(match value {
            1 => Self::Unsigned,
            4 => {
                lwarn!("sample format is undefined, assuming unsigned integers");

                Self::Unsigned
            }
            2 => Self::Signed,
            3 => Self::Float,
            _ => bail!(ConfigError::UnknownSampleFormat(value)),
        })
    }
}

/// The byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first (`II`).
    LittleEndian,
    /// Most significant byte first (`MM`).
    BigEndian,
}

impl ByteOrder {
    /// Resolve the two-byte marker at the start of a TIFF file.
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match &marker {
            b"II" => Some(Self::LittleEndian),
            b"MM" => Some(Self::BigEndian),
            _ => None,
        }
    }
}

/// A concrete sample type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Unsigned integer packed into less than a byte (1, 2 or 4 bits).
    Packed(u8),
    /// 8-bit unsigned integer.
    U8,
    /// 8-bit signed integer.
    I8,
    /// 16-bit unsigned integer.
    U16,
    /// 16-bit signed integer.
    I16,
    /// 32-bit unsigned integer.
    U32,
    /// 32-bit signed integer.
    I32,
    /// 64-bit unsigned integer.
    U64,
    /// 64-bit signed integer.
    I64,
    /// 32-bit IEEE float.
    F32,
    /// 64-bit IEEE float.
    F64,
}

impl SampleType {
    /// Resolve a sample type from the `SampleFormat` and `BitsPerSample` tags.
    pub fn from_tiff(format: SampleFormat, bits_per_sample: u16) -> Result<Self> {
        Ok(match (format, bits_per_sample) {
            (SampleFormat::Unsigned, 1 | 2 | 4) => Self::Packed(bits_per_sample as u8),
            (SampleFormat::Unsigned, 8) => Self::U8,
            (SampleFormat::Signed, 8) => Self::I8,
            (SampleFormat::Unsigned, 16) => Self::U16,
            (SampleFormat::Signed, 16) => Self::I16,
            (SampleFormat::Unsigned, 32) => Self::U32,
            (SampleFormat::Signed, 32) => Self::I32,
            (SampleFormat::Unsigned, 64) => Self::U64,
            (SampleFormat::Signed, 64) => Self::I64,
            (SampleFormat::Float, 32) => Self::F32,
            (SampleFormat::Float, 64) => Self::F64,
            _ => bail!(ConfigError::UnsupportedSampleType),
        })
    }

    /// The number of bits of one sample.
    pub fn bits(self) -> u8 {
        match self {
            Self::Packed(bits) => bits,
            Self::U8 | Self::I8 => 8,
            Self::U16 | Self::I16 => 16,
            Self::U32 | Self::I32 | Self::F32 => 32,
            Self::U64 | Self::I64 | Self::F64 => 64,
        }
    }

    /// The number of bytes of one sample, or `None` for packed samples.
    pub fn byte_width(self) -> Option<usize> {
        match self {
            Self::Packed(_) => None,
            _ => Some(self.bits() as usize / 8),
        }
    }

    /// Whether samples are floating point numbers.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether samples are signed.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::F32 | Self::F64
        )
    }
}
