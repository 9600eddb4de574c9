//! Reversal of the TIFF horizontal differencing predictor.
//!
//! With horizontal differencing, the first pixel of each row holds absolute
//! values, and every other sample holds the difference to the same band of
//! the pixel to its left. Integer differences wrap around.
//!
//! Decompressed data usually arrives in chunks whose boundaries have no
//! relation to pixels or rows, so [`HorizontalPredictor`] keeps the position
//! within the current row and the last decoded pixel between calls.

mod numeric;
mod reader;

pub use reader::PredictorReader;

use crate::error::{ConfigError, Result, bail};
use crate::log::{ldebug, ltrace};
use crate::sample::{ByteOrder, SampleType};
use numeric::Sample;

/// The value of the TIFF `Predictor` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Predictor {
    /// No prediction.
    #[default]
    None,
    /// Horizontal differencing.
    Horizontal,
    /// Floating point horizontal differencing with byte shuffling.
    FloatingPoint,
}

impl Predictor {
    /// Resolve the value of a `Predictor` tag.
    pub fn from_tag(value: u16) -> Result<Self> {
        Ok(match value {
            1 => Self::None,
            2 => Self::Horizontal,
            3 => Self::FloatingPoint,
            _ => bail!(ConfigError::UnknownPredictor(value)),
        })
    }

    /// Create the engine reversing this predictor, or `None` if the data
    /// is stored as-is.
    pub fn create(
        self,
        sample_type: SampleType,
        geometry: Geometry,
        byte_order: ByteOrder,
    ) -> Result<Option<HorizontalPredictor>> {
        match self {
            Self::None => Ok(None),
            Self::Horizontal => {
                HorizontalPredictor::new(sample_type, geometry, byte_order).map(Some)
            }
            Self::FloatingPoint => bail!(ConfigError::UnsupportedPredictor),
        }
    }
}

/// The layout of the pixels of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// The number of interleaved bands of a pixel.
    pub samples_per_pixel: u16,
    /// The number of pixels of a row.
    pub pixel_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleKind {
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl SampleKind {
    fn new(sample_type: SampleType) -> Result<Self> {
        Ok(match sample_type {
            SampleType::U8 | SampleType::I8 => Self::U8,
            SampleType::U16 | SampleType::I16 => Self::U16,
            SampleType::U32 | SampleType::I32 => Self::U32,
            SampleType::U64 | SampleType::I64 => Self::U64,
            SampleType::F32 => Self::F32,
            SampleType::F64 => Self::F64,
            SampleType::Packed(_) => bail!(ConfigError::UnsupportedSampleType),
        })
    }

    fn size(self) -> usize {
        match self {
            Self::U8 => u8::SIZE,
            Self::U16 => u16::SIZE,
            Self::U32 => u32::SIZE,
            Self::U64 => u64::SIZE,
            Self::F32 => f32::SIZE,
            Self::F64 => f64::SIZE,
        }
    }
}

/// Reverses horizontal differencing in place, one chunk at a time.
///
/// One instance decodes one region (a tile or a strip). Chunks must be
/// presented in order and without gaps.
#[derive(Debug, Clone)]
pub struct HorizontalPredictor {
    kind: SampleKind,
    byte_order: ByteOrder,
    geometry: Geometry,
    sample_size: usize,
    /// The number of bytes between a sample and the same band of the next pixel.
    pixel_stride: usize,
    /// The number of bytes of a row.
    scanline_stride: usize,
    /// The byte offset of the next sample within its row.
    column: usize,
    /// The last decoded value of every band, indexed by byte offset within the pixel.
    saved: Vec<u8>,
}

impl HorizontalPredictor {
    /// Create a new predictor for the given sample type and geometry.
    ///
    /// Fails for sample types smaller than a byte, and for empty geometries.
    pub fn new(sample_type: SampleType, geometry: Geometry, byte_order: ByteOrder) -> Result<Self> {
        let kind = SampleKind::new(sample_type)?;
        let sample_size = kind.size();

        if geometry.samples_per_pixel == 0 || geometry.pixel_width == 0 {
            bail!(ConfigError::InvalidGeometry);
        }

        let pixel_stride = geometry.samples_per_pixel as usize * sample_size;
        let scanline_stride = (geometry.pixel_width as usize)
            .checked_mul(pixel_stride)
            .ok_or(ConfigError::InvalidGeometry)?;

        if geometry.pixel_width == 1 {
            ldebug!("rows are one pixel wide, horizontal differencing has no effect");
        }

        ldebug!(
            "horizontal predictor for {:?}: pixel stride {}, scanline stride {}",
            sample_type,
            pixel_stride,
            scanline_stride
        );

        Ok(Self {
            kind,
            byte_order,
            geometry,
            sample_size,
            pixel_stride,
            scanline_stride,
            column: 0,
            saved: vec![0; pixel_stride],
        })
    }

    /// The geometry this predictor was created with.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The number of bytes of one sample.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// The number of bytes of one pixel.
    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// The number of bytes of one row.
    pub fn scanline_stride(&self) -> usize {
        self.scanline_stride
    }

    /// The byte offset within the current row at which the next call resumes.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Prepare for decoding a new region.
    pub fn reset(&mut self) {
        ldebug!("starting new region");

        self.column = 0;
        self.saved.fill(0);
    }

    /// Reverse the differencing of `buffer[start..end]` in place.
    ///
    /// Returns the position after the last complete sample. Trailing bytes of
    /// an incomplete sample are left untouched and must be presented again,
    /// followed by the rest of the data, in the next call.
    pub fn reverse(&mut self, buffer: &mut [u8], start: usize, end: usize) -> usize {
        let end = end.min(buffer.len());

        if start >= end {
            return start;
        }

        let stop = start + (end - start) / self.sample_size * self.sample_size;
        let region = &mut buffer[start..stop];

        match self.kind {
            SampleKind::U8 => self.reverse_samples::<u8>(region),
            SampleKind::U16 => self.reverse_samples::<u16>(region),
            SampleKind::U32 => self.reverse_samples::<u32>(region),
            SampleKind::U64 => self.reverse_samples::<u64>(region),
            SampleKind::F32 => self.reverse_samples::<f32>(region),
            SampleKind::F64 => self.reverse_samples::<f64>(region),
        }

        self.save_last_pixel(region);

        ltrace!(
            "reversed bytes {}..{}, next column {}",
            start,
            stop,
            self.column
        );

        stop
    }

    fn reverse_samples<T: Sample>(&mut self, region: &mut [u8]) {
        let size = T::SIZE;
        let order = self.byte_order;
        let pixel_stride = self.pixel_stride;
        let scanline_stride = self.scanline_stride;
        let len = region.len();
        let mut column = self.column;
        let mut pos = 0;

        // The left neighbours of the first `pixel_stride` bytes were decoded
        // by a previous call and are only available in `saved`.
        let opening = pixel_stride.min(len);

        while pos < opening {
            if column >= pixel_stride {
                let previous = T::read(&self.saved[column % pixel_stride..], order);
                let delta = T::read(&region[pos..], order);
                delta.accumulate(previous).write(&mut region[pos..], order);
            }

            pos += size;
            column += size;

            if column == scanline_stride {
                column = 0;
            }
        }

        while pos < len {
            if column < pixel_stride {
                // The first pixel of a row holds absolute values.
                let skip = (pixel_stride - column).min(len - pos);
                pos += skip;
                column += skip;
            } else {
                let row_end = (pos + scanline_stride - column).min(len);
                column += row_end - pos;

                while pos < row_end {
                    let previous = T::read(&region[pos - pixel_stride..], order);
                    let delta = T::read(&region[pos..], order);
                    delta.accumulate(previous).write(&mut region[pos..], order);

                    pos += size;
                }
            }

            if column == scanline_stride {
                column = 0;
            }
        }

        self.column = column;
    }

    /// Remember the last decoded pixel. If the region is shorter than a
    /// pixel, bands not present in it keep their previous value.
    fn save_last_pixel(&mut self, region: &[u8]) {
        let pixel_stride = self.pixel_stride;
        let tail_len = pixel_stride.min(region.len());
        let tail = &region[region.len() - tail_len..];
        let end_offset = self.column % pixel_stride;

        for (distance, &byte) in tail.iter().rev().enumerate() {
            let offset = (end_offset + pixel_stride - 1 - distance) % pixel_stride;
            self.saved[offset] = byte;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    /// Apply horizontal differencing to whole rows of samples.
    fn difference<T: Sample>(
        samples: &[T],
        bands: usize,
        width: usize,
        order: ByteOrder,
        sub: impl Fn(T, T) -> T,
    ) -> Vec<u8> {
        let mut out = vec![0; samples.len() * T::SIZE];

        for (i, &sample) in samples.iter().enumerate() {
            let column = i % (bands * width);
            let value = if column < bands {
                sample
            } else {
                sub(sample, samples[i - bands])
            };

            value.write(&mut out[i * T::SIZE..], order);
        }

        out
    }

    fn encode<T: Sample>(samples: &[T], order: ByteOrder) -> Vec<u8> {
        let mut out = vec![0; samples.len() * T::SIZE];

        for (i, &sample) in samples.iter().enumerate() {
            sample.write(&mut out[i * T::SIZE..], order);
        }

        out
    }

    fn predictor(sample_type: SampleType, bands: u16, width: u32) -> HorizontalPredictor {
        HorizontalPredictor::new(
            sample_type,
            Geometry {
                samples_per_pixel: bands,
                pixel_width: width,
            },
            ByteOrder::LittleEndian,
        )
        .unwrap()
    }

    #[test]
    fn test_single_band_bytes() {
        let mut data = [10, 1, 1, 1, 250, 20, 3, 253];
        let mut predictor = predictor(SampleType::U8, 1, 4);

        assert_eq!(predictor.reverse(&mut data, 0, 8), 8);
        assert_eq!(data, [10, 11, 12, 13, 250, 14, 17, 14]);
        assert_eq!(predictor.column(), 0);
    }

    #[test]
    fn test_interleaved_bands() {
        // Two RGB pixels per row.
        let mut data = [1, 2, 3, 1, 1, 1, 100, 100, 100, 255, 0, 1];
        let mut predictor = predictor(SampleType::U8, 3, 2);

        assert_eq!(predictor.reverse(&mut data, 0, 12), 12);
        assert_eq!(data, [1, 2, 3, 2, 3, 4, 100, 100, 100, 99, 100, 101]);
    }

    #[test]
    fn test_signed_wraparound() {
        let row: [i16; 4] = [-30000, 30000, -30000, 32767];
        let samples: Vec<u16> = row.iter().map(|&v| v as u16).collect();
        let mut data = difference(&samples, 1, 4, ByteOrder::BigEndian, u16::wrapping_sub);

        let mut predictor = HorizontalPredictor::new(
            SampleType::I16,
            Geometry {
                samples_per_pixel: 1,
                pixel_width: 4,
            },
            ByteOrder::BigEndian,
        )
        .unwrap();

        predictor.reverse(&mut data, 0, 8);
        assert_eq!(data, encode(&samples, ByteOrder::BigEndian));
    }

    #[test]
    fn test_round_trip_all_widths() {
        let order = ByteOrder::LittleEndian;

        let u32s: Vec<u32> = (0..24_u32)
            .map(|i| i.wrapping_mul(0x1357_9BDF).rotate_left(i))
            .collect();
        let mut data = difference(&u32s, 2, 4, order, u32::wrapping_sub);
        predictor(SampleType::U32, 2, 4).reverse(&mut data, 0, 96);
        assert_eq!(data, encode(&u32s, order));

        let u64s: Vec<u64> = (0..12).map(|i| u64::MAX - i * i * 0x0123_4567_89AB).collect();
        let mut data = difference(&u64s, 3, 2, order, u64::wrapping_sub);
        predictor(SampleType::I64, 3, 2).reverse(&mut data, 0, 96);
        assert_eq!(data, encode(&u64s, order));

        let f32s: Vec<f32> = (0..16).map(|i| (i * i) as f32 - 40.5).collect();
        let mut data = difference(&f32s, 1, 8, order, |a, b| a - b);
        predictor(SampleType::F32, 1, 8).reverse(&mut data, 0, 64);
        assert_eq!(data, encode(&f32s, order));

        let f64s: Vec<f64> = (0..16).map(|i| -0.125 * (i * 3) as f64).collect();
        let mut data = difference(&f64s, 4, 2, order, |a, b| a - b);
        predictor(SampleType::F64, 4, 2).reverse(&mut data, 0, 128);
        assert_eq!(data, encode(&f64s, order));
    }

    /// Reverse `encoded` in chunks of every possible size and compare each
    /// result against `expected`.
    fn assert_chunking_invariant(
        sample_type: SampleType,
        geometry: Geometry,
        order: ByteOrder,
        encoded: &[u8],
        expected: &[u8],
    ) {
        let len = encoded.len();

        for chunk in 1..=len {
            let mut predictor = HorizontalPredictor::new(sample_type, geometry, order).unwrap();
            let mut data = encoded.to_vec();
            let mut start = 0;
            let mut end = 0;

            while start < len {
                end = (end + chunk).min(len);
                start = predictor.reverse(&mut data, start, end);
            }

            assert_eq!(data, expected, "{sample_type:?}, chunk size {chunk}");
        }
    }

    fn geometry(samples_per_pixel: u16, pixel_width: u32) -> Geometry {
        Geometry {
            samples_per_pixel,
            pixel_width,
        }
    }

    #[test]
    fn test_chunks_of_every_size() {
        let order = ByteOrder::LittleEndian;

        let u8s: Vec<u8> = (0..40).map(|i| (i * 37) as u8).collect();
        let encoded = difference(&u8s, 2, 4, order, u8::wrapping_sub);
        assert_chunking_invariant(
            SampleType::U8,
            geometry(2, 4),
            order,
            &encoded,
            &encode(&u8s, order),
        );

        let u16s: Vec<u16> = (0..60).map(|i| (i * 7919) as u16).collect();
        let encoded = difference(&u16s, 3, 5, order, u16::wrapping_sub);
        assert_chunking_invariant(
            SampleType::U16,
            geometry(3, 5),
            order,
            &encoded,
            &encode(&u16s, order),
        );

        let u32s: Vec<u32> = (0..24_u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
        let encoded = difference(&u32s, 2, 3, order, u32::wrapping_sub);
        assert_chunking_invariant(
            SampleType::I32,
            geometry(2, 3),
            order,
            &encoded,
            &encode(&u32s, order),
        );

        let u64s: Vec<u64> = (0..18_u64)
            .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .collect();
        let encoded = difference(&u64s, 3, 2, order, u64::wrapping_sub);
        assert_chunking_invariant(
            SampleType::U64,
            geometry(3, 2),
            order,
            &encoded,
            &encode(&u64s, order),
        );
    }

    #[test]
    fn test_float_chunks_of_every_size() {
        let order = ByteOrder::BigEndian;

        // Quarter steps keep every difference and partial sum exact.
        let f32s: Vec<f32> = (0..30)
            .map(|i| ((i * 13) % 41) as f32 * 0.25 - 5.0)
            .collect();
        let encoded = difference(&f32s, 3, 5, order, |a, b| a - b);
        assert_chunking_invariant(
            SampleType::F32,
            geometry(3, 5),
            order,
            &encoded,
            &encode(&f32s, order),
        );

        let f64s: Vec<f64> = (0..24)
            .map(|i| ((i * 29) % 53) as f64 * -0.5 + 7.25)
            .collect();
        let encoded = difference(&f64s, 2, 4, order, |a, b| a - b);
        assert_chunking_invariant(
            SampleType::F64,
            geometry(2, 4),
            order,
            &encoded,
            &encode(&f64s, order),
        );
    }

    #[test]
    fn test_incomplete_sample() {
        let mut data = [0x01, 0x00, 0x01, 0x00, 0x02];
        let mut predictor = predictor(SampleType::U16, 1, 4);

        assert_eq!(predictor.reverse(&mut data, 0, 5), 4);
        assert_eq!(data, [0x01, 0x00, 0x02, 0x00, 0x02]);
        assert_eq!(predictor.column(), 4);

        // Too short for a single sample.
        assert_eq!(predictor.reverse(&mut data, 4, 5), 4);
        assert_eq!(predictor.column(), 4);
    }

    #[test]
    fn test_single_pixel_rows_are_untouched() {
        let mut data = [5, 200, 7, 9, 1, 3];
        let mut predictor = predictor(SampleType::U8, 2, 1);

        assert_eq!(predictor.reverse(&mut data, 0, 3), 3);
        assert_eq!(predictor.reverse(&mut data, 3, 6), 6);
        assert_eq!(data, [5, 200, 7, 9, 1, 3]);
        assert_eq!(predictor.column(), 0);
    }

    #[test]
    fn test_reset() {
        let mut predictor = predictor(SampleType::U8, 1, 4);

        let mut data = [1, 1, 1];
        predictor.reverse(&mut data, 0, 3);
        assert_eq!(predictor.column(), 3);

        predictor.reset();
        assert_eq!(predictor.column(), 0);

        let mut data = [9, 1, 1, 1];
        predictor.reverse(&mut data, 0, 4);
        assert_eq!(data, [9, 10, 11, 12]);
    }

    #[test]
    fn test_out_of_range_region() {
        let mut data = [1, 1, 1];
        let mut predictor = predictor(SampleType::U8, 1, 4);

        assert_eq!(predictor.reverse(&mut data, 2, 1), 2);
        assert_eq!(predictor.reverse(&mut data, 0, 10), 3);
        assert_eq!(data, [1, 2, 3]);
    }

    #[test]
    fn test_unsupported_configurations() {
        let geometry = Geometry {
            samples_per_pixel: 1,
            pixel_width: 8,
        };

        assert_eq!(
            HorizontalPredictor::new(SampleType::Packed(4), geometry, ByteOrder::BigEndian).err(),
            Some(DecodeError::Config(ConfigError::UnsupportedSampleType))
        );

        for geometry in [
            Geometry {
                samples_per_pixel: 0,
                pixel_width: 8,
            },
            Geometry {
                samples_per_pixel: 1,
                pixel_width: 0,
            },
        ] {
            assert_eq!(
                HorizontalPredictor::new(SampleType::U8, geometry, ByteOrder::BigEndian).err(),
                Some(DecodeError::Config(ConfigError::InvalidGeometry))
            );
        }
    }

    #[test]
    fn test_predictor_tag() {
        let geometry = Geometry {
            samples_per_pixel: 1,
            pixel_width: 8,
        };
        let create = |predictor: Predictor| {
            predictor.create(SampleType::U16, geometry, ByteOrder::LittleEndian)
        };

        assert_eq!(Predictor::from_tag(1), Ok(Predictor::None));
        assert_eq!(Predictor::from_tag(2), Ok(Predictor::Horizontal));
        assert_eq!(Predictor::from_tag(3), Ok(Predictor::FloatingPoint));
        assert_eq!(
            Predictor::from_tag(4),
            Err(DecodeError::Config(ConfigError::UnknownPredictor(4)))
        );

        assert!(create(Predictor::None).unwrap().is_none());
        assert_eq!(
            create(Predictor::Horizontal)
                .unwrap()
                .map(|p| p.scanline_stride()),
            Some(16)
        );
        assert_eq!(
            create(Predictor::FloatingPoint).err(),
            Some(DecodeError::Config(ConfigError::UnsupportedPredictor))
        );
    }
}
