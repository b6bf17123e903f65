#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (ops, stream) = data.split_at(data.len() / 2);
    let mut reader = BitReader::new(stream);

    // Use input bytes to drive a bounded sequence of operations.
    for chunk in ops.chunks(2).take(1024) {
        let op = chunk[0] % 6;
        let arg = chunk.get(1).copied().unwrap_or(1);

        match op {
            0 => {
                let _ = reader.read_bool();
            }
            1 => {
                let bits = u32::from(arg % 64) + 1;
                let _ = reader.read_bits(bits);
            }
            2 => {
                let _ = reader.align(u32::from(arg % 8) + 1);
            }
            3 => {
                let _ = reader.skip(u64::from(arg) + 1);
            }
            4 => {
                let _ = reader.read_signed_long(u32::from(arg % 64) + 1);
            }
            _ => {
                let _ = reader.read_unsigned(u32::from(arg % 31) + 1);
            }
        }
    }
});
