#![no_main]

use libfuzzer_sys::fuzz_target;
use tiff_codec::{ByteOrder, Geometry, HorizontalPredictor, SampleType};

// Header layout (6 bytes):
// [0]     sample type (index into SAMPLE_TYPES)
// [1]     samples per pixel
// [2..4]  pixel width (u16 LE)
// [4]     byte order (even = little endian)
// [5]     chunk size
// [6..]   differenced sample data

const HEADER_SIZE: usize = 6;

const SAMPLE_TYPES: [SampleType; 10] = [
    SampleType::U8,
    SampleType::I8,
    SampleType::U16,
    SampleType::I16,
    SampleType::U32,
    SampleType::I32,
    SampleType::U64,
    SampleType::I64,
    SampleType::F32,
    SampleType::F64,
];

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_SIZE {
        return;
    }

    let sample_type = SAMPLE_TYPES[data[0] as usize % SAMPLE_TYPES.len()];
    let geometry = Geometry {
        samples_per_pixel: data[1] as u16,
        pixel_width: u16::from_le_bytes([data[2], data[3]]) as u32,
    };
    let byte_order = if data[4] % 2 == 0 {
        ByteOrder::LittleEndian
    } else {
        ByteOrder::BigEndian
    };
    let chunk = data[5].max(1) as usize;

    let Ok(mut predictor) = HorizontalPredictor::new(sample_type, geometry, byte_order) else {
        return;
    };

    let mut whole = data[HEADER_SIZE..].to_vec();
    let mut chunked = whole.clone();
    let len = whole.len();

    let stop = predictor.reverse(&mut whole, 0, len);
    assert!(len - stop < predictor.sample_size());

    // Decoding in chunks must give the same result.
    predictor.reset();
    let mut start = 0;
    let mut end = 0;

    while end < len {
        end = (end + chunk).min(len);
        start = predictor.reverse(&mut chunked, start, end);
    }

    assert_eq!(start, stop);
    // Compare bit patterns, floats may be NaN.
    assert_eq!(whole, chunked);
});
