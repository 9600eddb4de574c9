//! Error types for predictor and run-length decoding.

use core::fmt;

/// The main error type for decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Errors related to reading the input data.
    Parse(ParseError),
    /// Errors related to the decoder configuration.
    Config(ConfigError),
    /// Errors related to Huffman decoding.
    Huffman(HuffmanError),
    /// Arithmetic overflow in calculations.
    Overflow,
}

/// Errors related to reading the input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Unexpected end of input.
    UnexpectedEof,
    /// The requested region lies outside of the data.
    RegionOutOfBounds,
}

/// Errors related to the decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The `SampleFormat` tag value is unknown.
    UnknownSampleFormat(u16),
    /// The `Predictor` tag value is unknown.
    UnknownPredictor(u16),
    /// The combination of sample format and bits per sample is not supported.
    UnsupportedSampleType,
    /// The predictor is known but not implemented.
    UnsupportedPredictor,
    /// The pixel geometry is invalid.
    InvalidGeometry,
}

/// Errors related to Huffman decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanError {
    /// The bit sequence does not correspond to any code.
    InvalidCode,
    /// A run extends past the end of the coded line.
    LineOverflow,
    /// A code collides with another code of the same table.
    Collision,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Huffman(e) => write!(f, "{e}"),
            Self::Overflow => write!(f, "arithmetic overflow"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::RegionOutOfBounds => write!(f, "region lies outside of the data"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSampleFormat(v) => write!(f, "unknown sample format {v}"),
            Self::UnknownPredictor(v) => write!(f, "unknown predictor {v}"),
            Self::UnsupportedSampleType => write!(f, "unsupported sample type"),
            Self::UnsupportedPredictor => write!(f, "unsupported predictor"),
            Self::InvalidGeometry => write!(f, "invalid pixel geometry"),
        }
    }
}

impl fmt::Display for HuffmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCode => write!(f, "invalid Huffman code"),
            Self::LineOverflow => write!(f, "run extends past the end of the line"),
            Self::Collision => write!(f, "colliding Huffman codes"),
        }
    }
}

impl core::error::Error for DecodeError {}
impl core::error::Error for ParseError {}
impl core::error::Error for ConfigError {}
impl core::error::Error for HuffmanError {}

impl From<ParseError> for DecodeError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<ConfigError> for DecodeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HuffmanError> for DecodeError {
    fn from(e: HuffmanError) -> Self {
        Self::Huffman(e)
    }
}

/// Result type for decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;
