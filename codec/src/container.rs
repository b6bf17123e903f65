//! Length-prefixed container codecs.
//!
//! A container writes its element count first (fixed-width or VLQ,
//! caller's choice), followed by the elements through a supplied
//! element codec. These are mechanical compositions of the core
//! primitives; the interesting invariants live below them.

use bitstream::{BitReader, BitWriter, ByteSink, ByteSource};

use crate::error::{CodecError, CodecResult};
use crate::traits::Codec;
use crate::vlq::{read_vlq_u64, write_vlq_u64};

/// How a container encodes its element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthPrefix {
    /// Unsigned fixed-width count of `bits` bits, 1..=31.
    Fixed { bits: u32 },
    /// Variable-length count; no upper bound beyond the VLQ's own.
    Vlq,
}

impl LengthPrefix {
    /// Fixed-width count.
    #[must_use]
    pub const fn fixed(bits: u32) -> Self {
        Self::Fixed { bits }
    }

    /// Variable-length count.
    #[must_use]
    pub const fn vlq() -> Self {
        Self::Vlq
    }

    fn encode_len<S: ByteSink>(self, out: &mut BitWriter<S>, len: usize) -> CodecResult<()> {
        let len = len as u64;
        match self {
            Self::Fixed { bits } => {
                let max = if bits >= 64 {
                    u64::MAX
                } else {
                    (1u64 << bits) - 1
                };
                if len > max {
                    return Err(CodecError::LengthOverflow { length: len, max });
                }
                out.write_unsigned(bits, len as u32)?;
                Ok(())
            }
            Self::Vlq => write_vlq_u64(out, len),
        }
    }

    fn decode_len<S: ByteSource>(self, input: &mut BitReader<S>) -> CodecResult<usize> {
        let len = match self {
            Self::Fixed { bits } => u64::from(input.read_unsigned(bits)?),
            Self::Vlq => read_vlq_u64(input)?,
        };
        usize::try_from(len).map_err(|_| CodecError::InvalidLength { length: len })
    }
}

/// Lengths are attacker-controlled on the read side; preallocation is
/// capped and the vector grows as elements actually arrive.
const PREALLOC_CAP: usize = 1024;

/// Length-prefixed byte array, 8 bits per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BytesCodec {
    length: LengthPrefix,
}

impl BytesCodec {
    /// Creates the codec with the given count encoding.
    #[must_use]
    pub const fn new(length: LengthPrefix) -> Self {
        Self { length }
    }
}

impl Codec for BytesCodec {
    type Value = Vec<u8>;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &Vec<u8>) -> CodecResult<()> {
        self.length.encode_len(out, value.len())?;
        for &byte in value {
            out.write_bits(u64::from(byte), 8)?;
        }
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<Vec<u8>> {
        let len = self.length.decode_len(input)?;
        let mut bytes = Vec::with_capacity(len.min(PREALLOC_CAP));
        for _ in 0..len {
            bytes.push(input.read_bits(8)? as u8);
        }
        Ok(bytes)
    }
}

/// Length-prefixed string of UTF-16 code units, 16 bits per unit.
///
/// The count is the code-unit count, not the character count; decoding
/// rejects unpaired surrogates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Utf16StringCodec {
    length: LengthPrefix,
}

impl Utf16StringCodec {
    /// Creates the codec with the given count encoding.
    #[must_use]
    pub const fn new(length: LengthPrefix) -> Self {
        Self { length }
    }
}

impl Codec for Utf16StringCodec {
    type Value = String;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &String) -> CodecResult<()> {
        self.length.encode_len(out, value.encode_utf16().count())?;
        for unit in value.encode_utf16() {
            out.write_char16(unit)?;
        }
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<String> {
        let len = self.length.decode_len(input)?;
        let mut units = Vec::with_capacity(len.min(PREALLOC_CAP));
        for _ in 0..len {
            units.push(input.read_char16()?);
        }
        char::decode_utf16(units)
            .collect::<Result<String, _>>()
            .map_err(|err| CodecError::InvalidString {
                unit: err.unpaired_surrogate(),
            })
    }
}

/// Character repertoires for [`AsciiStringCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsciiMode {
    /// Full ASCII, 7 bits per character.
    Seven,
    /// The printable subset `0x20..=0x5F` (space, digits, uppercase,
    /// common punctuation) in 6 bits per character.
    Sixbit,
}

impl AsciiMode {
    const fn bits(self) -> u32 {
        match self {
            Self::Seven => 7,
            Self::Sixbit => 6,
        }
    }

    fn encode_char(self, ch: char) -> Option<u64> {
        let code = ch as u32;
        match self {
            Self::Seven if code <= 0x7F => Some(u64::from(code)),
            Self::Sixbit if (0x20..=0x5F).contains(&code) => Some(u64::from(code - 0x20)),
            _ => None,
        }
    }

    fn decode_char(self, raw: u64) -> char {
        let code = match self {
            Self::Seven => raw as u32,
            Self::Sixbit => raw as u32 + 0x20,
        };
        // Both repertoires land inside ASCII, always a valid char.
        char::from_u32(code).unwrap_or('\u{FFFD}')
    }
}

/// Length-prefixed ASCII string with sub-byte characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsciiStringCodec {
    length: LengthPrefix,
    mode: AsciiMode,
}

impl AsciiStringCodec {
    /// Creates a 7-bit ASCII codec.
    #[must_use]
    pub const fn new(length: LengthPrefix) -> Self {
        Self {
            length,
            mode: AsciiMode::Seven,
        }
    }

    /// Creates a codec with an explicit repertoire.
    #[must_use]
    pub const fn with_mode(length: LengthPrefix, mode: AsciiMode) -> Self {
        Self { length, mode }
    }
}

impl Codec for AsciiStringCodec {
    type Value = String;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &String) -> CodecResult<()> {
        self.length.encode_len(out, value.chars().count())?;
        for ch in value.chars() {
            let code = self
                .mode
                .encode_char(ch)
                .ok_or(CodecError::UnencodableChar { ch })?;
            out.write_bits(code, self.mode.bits())?;
        }
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<String> {
        let len = self.length.decode_len(input)?;
        let mut text = String::with_capacity(len.min(PREALLOC_CAP));
        for _ in 0..len {
            let raw = input.read_bits(self.mode.bits())?;
            text.push(self.mode.decode_char(raw));
        }
        Ok(text)
    }
}

/// Length-prefixed homogeneous list over a supplied element codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCodec<C> {
    length: LengthPrefix,
    element: C,
}

impl<C: Codec> ListCodec<C> {
    /// Creates the codec with the given count encoding and element codec.
    pub const fn new(length: LengthPrefix, element: C) -> Self {
        Self { length, element }
    }

    /// Returns the element codec.
    pub fn element(&self) -> &C {
        &self.element
    }
}

impl<C: Codec> Codec for ListCodec<C> {
    type Value = Vec<C::Value>;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &Vec<C::Value>) -> CodecResult<()> {
        self.length.encode_len(out, value.len())?;
        for element in value {
            self.element.encode(out, element)?;
        }
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<Vec<C::Value>> {
        let len = self.length.decode_len(input)?;
        let mut elements = Vec::with_capacity(len.min(PREALLOC_CAP));
        for _ in 0..len {
            elements.push(self.element.decode(input)?);
        }
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::SIntCodec;

    fn roundtrip<C: Codec>(codec: &C, value: &C::Value) -> C::Value {
        let mut writer = BitWriter::in_memory();
        codec.encode(&mut writer, value).unwrap();
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes[..]);
        codec.decode(&mut reader).unwrap()
    }

    #[test]
    fn bytes_roundtrip_fixed_prefix() {
        let codec = BytesCodec::new(LengthPrefix::fixed(10));
        let data = vec![0u8, 1, 127, 255];
        assert_eq!(roundtrip(&codec, &data), data);
        assert_eq!(roundtrip(&codec, &Vec::new()), Vec::<u8>::new());
    }

    #[test]
    fn bytes_roundtrip_vlq_prefix() {
        let codec = BytesCodec::new(LengthPrefix::vlq());
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(roundtrip(&codec, &data), data);
    }

    #[test]
    fn fixed_prefix_overflow_is_precondition() {
        let codec = BytesCodec::new(LengthPrefix::fixed(2));
        let mut writer = BitWriter::in_memory();
        let err = codec.encode(&mut writer, &vec![0u8; 4]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LengthOverflow { length: 4, max: 3 }
        ));
        assert!(err.is_precondition());
        assert_eq!(writer.bits_written(), 0, "nothing written before the check");
    }

    #[test]
    fn utf16_string_roundtrip() {
        let codec = Utf16StringCodec::new(LengthPrefix::vlq());
        for text in ["", "hello", "héllo wörld", "\u{1F600} beyond the BMP"] {
            assert_eq!(roundtrip(&codec, &text.to_owned()), text);
        }
    }

    #[test]
    fn utf16_count_is_code_units() {
        let codec = Utf16StringCodec::new(LengthPrefix::fixed(8));
        let text = "\u{1F600}".to_owned(); // one char, two code units
        let mut writer = BitWriter::in_memory();
        codec.encode(&mut writer, &text).unwrap();
        assert_eq!(writer.bits_written(), 8 + 2 * 16);
    }

    #[test]
    fn utf16_lone_surrogate_rejected() {
        let mut writer = BitWriter::in_memory();
        writer.write_unsigned(8, 1).unwrap();
        writer.write_char16(0xD800).unwrap();
        let bytes = writer.finish();

        let codec = Utf16StringCodec::new(LengthPrefix::fixed(8));
        let mut reader = BitReader::new(&bytes[..]);
        assert!(matches!(
            codec.decode(&mut reader),
            Err(CodecError::InvalidString { unit: 0xD800 })
        ));
    }

    #[test]
    fn ascii_seven_bit_packing() {
        let codec = AsciiStringCodec::new(LengthPrefix::fixed(8));
        let text = "Hi!".to_owned();
        let mut writer = BitWriter::in_memory();
        codec.encode(&mut writer, &text).unwrap();
        assert_eq!(writer.bits_written(), 8 + 3 * 7);
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(codec.decode(&mut reader).unwrap(), text);
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        let codec = AsciiStringCodec::new(LengthPrefix::vlq());
        let mut writer = BitWriter::in_memory();
        let err = codec.encode(&mut writer, &"héllo".to_owned()).unwrap_err();
        assert!(matches!(err, CodecError::UnencodableChar { ch: 'é' }));
    }

    #[test]
    fn sixbit_roundtrip_and_rejection() {
        let codec = AsciiStringCodec::with_mode(LengthPrefix::vlq(), AsciiMode::Sixbit);
        let text = "HELLO WORLD 42 +/-".to_owned();
        assert_eq!(roundtrip(&codec, &text), text);

        let mut writer = BitWriter::in_memory();
        codec.encode(&mut writer, &text).unwrap();
        assert_eq!(writer.bits_written(), 8 + 18 * 6);

        let mut writer = BitWriter::in_memory();
        assert!(matches!(
            codec.encode(&mut writer, &"lower".to_owned()),
            Err(CodecError::UnencodableChar { ch: 'l' })
        ));
    }

    #[test]
    fn list_of_signed_ints() {
        let codec = ListCodec::new(LengthPrefix::vlq(), SIntCodec::new(11));
        let values = vec![-1024i32, -1, 0, 1, 1023];
        assert_eq!(roundtrip(&codec, &values), values);
    }

    #[test]
    fn nested_list() {
        let codec = ListCodec::new(
            LengthPrefix::fixed(4),
            ListCodec::new(LengthPrefix::fixed(4), SIntCodec::new(6)),
        );
        let values = vec![vec![1i32, -2], vec![], vec![31, -32]];
        assert_eq!(roundtrip(&codec, &values), values);
    }

    #[test]
    fn nullable_list_composition() {
        use crate::nullable::nullable;

        let codec = nullable(ListCodec::new(LengthPrefix::vlq(), SIntCodec::new(8)));
        assert_eq!(roundtrip(&codec, &None), None);
        assert_eq!(
            roundtrip(&codec, &Some(vec![-5i32, 6])),
            Some(vec![-5i32, 6])
        );
    }
}
