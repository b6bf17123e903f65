#![no_main]

use bitstream::BitReader;
use codec::{
    read_vlq_u32, read_vlq_u64, BytesCodec, Codec, FloatCodec, LengthPrefix, ListCodec,
    NanCodec, SIntCodec, Utf16StringCodec,
};
use libfuzzer_sys::fuzz_target;

// Decoders must reject or decode arbitrary bytes without panicking.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let exponent = u32::from(data[0] % 10) + 2;
    let significand = u32::from(data[1] % 52) + 1;
    let stream = &data[2..];

    if let Ok(float) = FloatCodec::<f32>::new(exponent.min(8), significand.min(23)) {
        let mut reader = BitReader::new(stream);
        while float.decode(&mut reader).is_ok() {}
    }
    if let Ok(double) = FloatCodec::<f64>::new(exponent, significand) {
        let mut reader = BitReader::new(stream);
        while double.decode(&mut reader).is_ok() {}
    }
    if let Ok(nan) = NanCodec::<f64>::significand_only(significand) {
        let mut reader = BitReader::new(stream);
        let _ = nan.decode(&mut reader);
    }

    let mut reader = BitReader::new(stream);
    let _ = read_vlq_u32(&mut reader);
    let mut reader = BitReader::new(stream);
    let _ = read_vlq_u64(&mut reader);

    let bytes_codec = BytesCodec::new(LengthPrefix::vlq());
    let mut reader = BitReader::new(stream);
    let _ = bytes_codec.decode(&mut reader);

    let string_codec = Utf16StringCodec::new(LengthPrefix::fixed(16));
    let mut reader = BitReader::new(stream);
    let _ = string_codec.decode(&mut reader);

    let list_codec = ListCodec::new(LengthPrefix::vlq(), SIntCodec::new(13));
    let mut reader = BitReader::new(stream);
    let _ = list_codec.decode(&mut reader);
});
