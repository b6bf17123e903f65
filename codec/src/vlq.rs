//! Variable-length quantity encoding.
//!
//! A non-negative integer is stored as 7-bit groups, least-significant
//! group first; each group is preceded by a continuation bit (1 = more
//! groups follow). Decoding is bounded: 5 groups for 32-bit values, 10
//! for 64-bit, and payload bits past the type width are rejected.

use bitstream::{BitReader, BitWriter, ByteSink, ByteSource};

use crate::error::{CodecError, CodecResult};
use crate::traits::Codec;

/// Writes `value` as a VLQ, 8 bits per group.
pub fn write_vlq_u64<S: ByteSink>(out: &mut BitWriter<S>, value: u64) -> CodecResult<()> {
    let mut rest = value;
    loop {
        let group = rest & 0x7F;
        rest >>= 7;
        let more = rest != 0;
        out.write_bool(more)?;
        out.write_bits(group, 7)?;
        if !more {
            return Ok(());
        }
    }
}

/// Writes `value` as a VLQ, 8 bits per group.
pub fn write_vlq_u32<S: ByteSink>(out: &mut BitWriter<S>, value: u32) -> CodecResult<()> {
    write_vlq_u64(out, u64::from(value))
}

/// Reads a VLQ of at most 10 groups.
pub fn read_vlq_u64<S: ByteSource>(input: &mut BitReader<S>) -> CodecResult<u64> {
    let mut result = 0u64;
    for shift in (0..64).step_by(7) {
        let more = input.read_bool()?;
        let group = input.read_bits(7)?;
        if shift + 7 > 64 && group >> (64 - shift) != 0 {
            return Err(CodecError::InvalidVarint { max_bits: 64 });
        }
        result |= group << shift;
        if !more {
            return Ok(result);
        }
    }
    Err(CodecError::InvalidVarint { max_bits: 64 })
}

/// Reads a VLQ of at most 5 groups.
pub fn read_vlq_u32<S: ByteSource>(input: &mut BitReader<S>) -> CodecResult<u32> {
    let mut result = 0u32;
    for shift in (0..32).step_by(7) {
        let more = input.read_bool()?;
        let group = input.read_bits(7)? as u32;
        if shift + 7 > 32 && group >> (32 - shift) != 0 {
            return Err(CodecError::InvalidVarint { max_bits: 32 });
        }
        result |= group << shift;
        if !more {
            return Ok(result);
        }
    }
    Err(CodecError::InvalidVarint { max_bits: 32 })
}

/// [`Codec`] over `u64` values in VLQ form, for container composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlqCodec;

impl Codec for VlqCodec {
    type Value = u64;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &u64) -> CodecResult<()> {
        write_vlq_u64(out, *value)
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<u64> {
        read_vlq_u64(input)
    }
}
