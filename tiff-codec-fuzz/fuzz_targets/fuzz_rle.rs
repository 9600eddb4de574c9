#![no_main]

use libfuzzer_sys::fuzz_target;

// Header layout (5 bytes):
// [0..2]  columns (u16 LE)
// [2..4]  rows (u16 LE)
// [4]     black_is_1 (bool)
// [5..]   CCITT RLE encoded data

const HEADER_SIZE: usize = 5;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_SIZE {
        return;
    }

    let settings = tiff_codec::RleSettings {
        columns: u16::from_le_bytes([data[0], data[1]]).max(1) as u32,
        rows: (u16::from_le_bytes([data[2], data[3]]) % 1024) as u32,
        black_is_1: data[4] != 0,
    };

    if let Ok(decoded) = tiff_codec::decode_rle(&data[HEADER_SIZE..], &settings) {
        assert_eq!(decoded.len(), settings.row_bytes() * settings.rows as usize);
    }
});
