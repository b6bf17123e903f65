//! Integer element codecs over the cursor's typed operations.
//!
//! The cursor already exposes sized integer reads and writes directly;
//! these thin adapters exist so integers can participate in [`Codec`]
//! composition (lists, nullable wrappers). Sizes are validated by the
//! cursor on every call.

use bitstream::{BitReader, BitWriter, ByteSink, ByteSource};

use crate::error::CodecResult;
use crate::traits::Codec;

/// The unsigned 1-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &bool) -> CodecResult<()> {
        out.write_bool(*value)?;
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<bool> {
        Ok(input.read_bool()?)
    }
}

/// Unsigned integer in `bits` bits, 1..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UIntCodec {
    bits: u32,
}

impl UIntCodec {
    /// Creates the codec; the width is checked on each call.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self { bits }
    }
}

impl Codec for UIntCodec {
    type Value = u32;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &u32) -> CodecResult<()> {
        out.write_unsigned(self.bits, *value)?;
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<u32> {
        Ok(input.read_unsigned(self.bits)?)
    }
}

/// Signed integer in `bits` bits, 1..=32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SIntCodec {
    bits: u32,
}

impl SIntCodec {
    /// Creates the codec; the width is checked on each call.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self { bits }
    }
}

impl Codec for SIntCodec {
    type Value = i32;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &i32) -> CodecResult<()> {
        out.write_signed(self.bits, *value)?;
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<i32> {
        Ok(input.read_signed(self.bits)?)
    }
}

/// Unsigned long in `bits` bits, 1..=63.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ULongCodec {
    bits: u32,
}

impl ULongCodec {
    /// Creates the codec; the width is checked on each call.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self { bits }
    }
}

impl Codec for ULongCodec {
    type Value = u64;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &u64) -> CodecResult<()> {
        out.write_unsigned_long(self.bits, *value)?;
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<u64> {
        Ok(input.read_unsigned_long(self.bits)?)
    }
}

/// Signed long in `bits` bits, 1..=64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SLongCodec {
    bits: u32,
}

impl SLongCodec {
    /// Creates the codec; the width is checked on each call.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self { bits }
    }
}

impl Codec for SLongCodec {
    type Value = i64;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &i64) -> CodecResult<()> {
        out.write_signed_long(self.bits, *value)?;
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<i64> {
        Ok(input.read_signed_long(self.bits)?)
    }
}

/// 16-bit character code unit in `bits` bits, 1..=16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharCodec {
    bits: u32,
}

impl CharCodec {
    /// Creates the codec; the width is checked on each call.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self { bits }
    }
}

impl Codec for CharCodec {
    type Value = u16;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &u16) -> CodecResult<()> {
        out.write_char(self.bits, *value)?;
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<u16> {
        Ok(input.read_char(self.bits)?)
    }
}
