/*!
Sample-level decoding helpers for TIFF rasters.

`tiff-codec` implements the parts of TIFF decoding that sit between the
decompressor and the final pixel buffer:

- Reversal of the horizontal differencing predictor (`Predictor` tag 2), for
  8, 16, 32 and 64-bit integer samples as well as 32 and 64-bit floats, with
  any number of interleaved bands. Data can be processed in arbitrarily sized
  chunks.
- Decoding of CCITT Modified Huffman run lengths (TIFF compression 2), both
  run by run and for whole strips.
- Resolving the `SampleFormat` and `BitsPerSample` tags into a concrete
  sample type.

# Example
```rust
use tiff_codec::{ByteOrder, Geometry, HorizontalPredictor, SampleType};

// Two RGB pixels, where the second one is stored as the difference to the first.
let mut row = [10, 20, 30, 1, 2, 3];
let mut predictor = HorizontalPredictor::new(
    SampleType::U8,
    Geometry {
        samples_per_pixel: 3,
        pixel_width: 2,
    },
    ByteOrder::LittleEndian,
)
.unwrap();

predictor.reverse(&mut row, 0, 6);
assert_eq!(row, [10, 20, 30, 11, 22, 33]);
```

# Cargo features
- `logging`: Emit diagnostics via the `log` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod log;

pub mod ccitt;
mod channel;
mod error;
pub mod predictor;
mod sample;

pub use ccitt::{Color, RleSettings, RunDecoder, decode_rle, decode_rle_region};
pub use channel::ByteChannel;
pub use error::{ConfigError, DecodeError, HuffmanError, ParseError, Result};
pub use predictor::{Geometry, HorizontalPredictor, Predictor, PredictorReader};
pub use sample::{ByteOrder, SampleFormat, SampleType};
