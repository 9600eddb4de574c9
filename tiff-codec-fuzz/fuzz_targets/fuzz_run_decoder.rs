#![no_main]

use libfuzzer_sys::fuzz_target;
use tiff_codec::{ByteChannel, Color, RunDecoder};

// Header layout (1 byte):
// [0]     line length in runs before the color is reset (0 = never)
// [1..]   Modified Huffman coded runs

const HEADER_SIZE: usize = 1;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_SIZE {
        return;
    }

    let line_runs = data[0] as usize;
    let mut channel = ByteChannel::new(&data[HEADER_SIZE..]);
    let mut decoder = RunDecoder::new();
    let mut runs = 0;

    loop {
        if line_runs != 0 && runs % line_runs == 0 {
            decoder.start_line();
            assert_eq!(decoder.color(), Color::White);
        }

        let color = decoder.color();
        let before = channel.byte_pos() * 8 + channel.bit_pos();

        match decoder.next_run_length(&mut channel) {
            Ok(_) => {
                assert_eq!(decoder.color(), color.opposite());
                // Every run consumes at least two bits.
                assert!(channel.byte_pos() * 8 + channel.bit_pos() >= before + 2);
            }
            Err(_) => {
                assert_eq!(decoder.color(), color);
                break;
            }
        }

        runs += 1;
    }
});
