//! Custom-precision IEEE-754-shaped float codec.
//!
//! A value is stored as sign (1 bit), a re-biased exponent field of a
//! caller-chosen width, and the high bits of the native significand.
//! Precision is reduced; magnitude never is: a normal exponent that does
//! not fit the narrow field is rejected, not renormalized.

use std::marker::PhantomData;

use bitstream::{BitReader, BitWriter, ByteSink, ByteSource};

use crate::error::{CodecError, CodecResult};
use crate::traits::Codec;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// An IEEE-754 binary float whose bit pattern the codecs can repack.
///
/// Implemented by `f32` and `f64` only.
pub trait IeeeFloat: sealed::Sealed + Copy {
    /// Exponent field width of the native format.
    const EXPONENT_BITS: u32;
    /// Significand field width of the native format.
    const SIGNIFICAND_BITS: u32;

    /// The native bit pattern, widened to 64 bits.
    fn to_bits64(self) -> u64;
    /// Rebuilds a value from a native bit pattern in the low bits.
    fn from_bits64(bits: u64) -> Self;
}

impl IeeeFloat for f32 {
    const EXPONENT_BITS: u32 = 8;
    const SIGNIFICAND_BITS: u32 = 23;

    fn to_bits64(self) -> u64 {
        u64::from(self.to_bits())
    }

    fn from_bits64(bits: u64) -> Self {
        Self::from_bits(bits as u32)
    }
}

impl IeeeFloat for f64 {
    const EXPONENT_BITS: u32 = 11;
    const SIGNIFICAND_BITS: u32 = 52;

    fn to_bits64(self) -> u64 {
        self.to_bits()
    }

    fn from_bits64(bits: u64) -> Self {
        Self::from_bits(bits)
    }
}

/// Narrowest supported exponent field. Anything smaller has no room for a
/// normal exponent between the all-zero and all-one encodings.
pub const MIN_EXPONENT_BITS: u32 = 2;

/// Narrowest supported significand field. NaN needs a non-zero significand.
pub const MIN_SIGNIFICAND_BITS: u32 = 1;

pub(crate) const fn field_mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

const fn bias(exponent_bits: u32) -> i64 {
    (1i64 << (exponent_bits - 1)) - 1
}

pub(crate) fn check_exponent_bits<F: IeeeFloat>(bits: u32) -> CodecResult<()> {
    if bits < MIN_EXPONENT_BITS || bits > F::EXPONENT_BITS {
        return Err(CodecError::InvalidExponentSize {
            bits,
            min: MIN_EXPONENT_BITS,
            max: F::EXPONENT_BITS,
        });
    }
    Ok(())
}

pub(crate) fn check_significand_bits<F: IeeeFloat>(bits: u32) -> CodecResult<()> {
    if bits < MIN_SIGNIFICAND_BITS || bits > F::SIGNIFICAND_BITS {
        return Err(CodecError::InvalidSignificandSize {
            bits,
            min: MIN_SIGNIFICAND_BITS,
            max: F::SIGNIFICAND_BITS,
        });
    }
    Ok(())
}

/// General custom-precision codec for a float type `F`.
///
/// Field widths are validated at construction; the codec itself is an
/// immutable value, cheap to copy and safe to share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatCodec<F: IeeeFloat> {
    exponent_bits: u32,
    significand_bits: u32,
    _float: PhantomData<F>,
}

impl<F: IeeeFloat> FloatCodec<F> {
    /// Creates a codec with the given field widths.
    ///
    /// # Errors
    ///
    /// `exponent_bits` must be in `MIN_EXPONENT_BITS..=F::EXPONENT_BITS`
    /// and `significand_bits` in `MIN_SIGNIFICAND_BITS..=F::SIGNIFICAND_BITS`.
    pub fn new(exponent_bits: u32, significand_bits: u32) -> CodecResult<Self> {
        check_exponent_bits::<F>(exponent_bits)?;
        check_significand_bits::<F>(significand_bits)?;
        Ok(Self {
            exponent_bits,
            significand_bits,
            _float: PhantomData,
        })
    }

    /// Exponent field width.
    #[must_use]
    pub const fn exponent_bits(&self) -> u32 {
        self.exponent_bits
    }

    /// Significand field width.
    #[must_use]
    pub const fn significand_bits(&self) -> u32 {
        self.significand_bits
    }

    /// Total encoded width: sign + exponent + significand.
    #[must_use]
    pub const fn total_bits(&self) -> u32 {
        1 + self.exponent_bits + self.significand_bits
    }
}

impl<F: IeeeFloat> Codec for FloatCodec<F> {
    type Value = F;

    fn encode<S: ByteSink>(&self, out: &mut BitWriter<S>, value: &F) -> CodecResult<()> {
        let native = value.to_bits64();
        let ne = F::EXPONENT_BITS;
        let ns = F::SIGNIFICAND_BITS;
        let sign = (native >> (ne + ns)) & 1;
        let exp = (native >> ns) & field_mask(ne);
        let sig = native & field_mask(ns);

        let mut sig_out = sig >> (ns - self.significand_bits);
        let exp_out = if exp == field_mask(ne) {
            // Infinity or NaN: the exponent stays all ones in the narrow
            // width. A NaN whose payload truncates away must keep a
            // non-zero significand or it would decode as infinity.
            if sig != 0 && sig_out == 0 {
                sig_out = 1;
            }
            field_mask(self.exponent_bits)
        } else if exp == 0 {
            // Zero or subnormal: the all-zero field maps across widths.
            0
        } else {
            let unbiased = exp as i64 - bias(ne);
            let rebiased = unbiased + bias(self.exponent_bits);
            if rebiased < 1 || rebiased > field_mask(self.exponent_bits) as i64 - 1 {
                return Err(CodecError::ExponentOutOfRange {
                    unbiased: unbiased as i32,
                    exponent_bits: self.exponent_bits,
                });
            }
            rebiased as u64
        };

        out.write_bits(sign, 1)?;
        out.write_bits(exp_out, self.exponent_bits)?;
        out.write_bits(sig_out, self.significand_bits)?;
        Ok(())
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<F> {
        let sign = input.read_bits(1)?;
        let exp_in = input.read_bits(self.exponent_bits)?;
        let sig_in = input.read_bits(self.significand_bits)?;

        let ne = F::EXPONENT_BITS;
        let ns = F::SIGNIFICAND_BITS;
        let exp = if exp_in == field_mask(self.exponent_bits) {
            field_mask(ne)
        } else if exp_in == 0 {
            0
        } else {
            // Narrow widths re-bias into a strict subset of the native
            // normal range, so this cannot leave the native field.
            (exp_in as i64 - bias(self.exponent_bits) + bias(ne)) as u64
        };
        let sig = sig_in << (ns - self.significand_bits);

        Ok(F::from_bits64((sign << (ne + ns)) | (exp << ns) | sig))
    }
}

/// Writes `value` with the given field widths; widths are validated per call.
pub fn write_float<S: ByteSink>(
    out: &mut BitWriter<S>,
    exponent_bits: u32,
    significand_bits: u32,
    value: f32,
) -> CodecResult<()> {
    FloatCodec::<f32>::new(exponent_bits, significand_bits)?.encode(out, &value)
}

/// Reads an `f32` with the given field widths; widths are validated per call.
pub fn read_float<S: ByteSource>(
    input: &mut BitReader<S>,
    exponent_bits: u32,
    significand_bits: u32,
) -> CodecResult<f32> {
    FloatCodec::<f32>::new(exponent_bits, significand_bits)?.decode(input)
}

/// Writes `value` with the given field widths; widths are validated per call.
pub fn write_double<S: ByteSink>(
    out: &mut BitWriter<S>,
    exponent_bits: u32,
    significand_bits: u32,
    value: f64,
) -> CodecResult<()> {
    FloatCodec::<f64>::new(exponent_bits, significand_bits)?.encode(out, &value)
}

/// Reads an `f64` with the given field widths; widths are validated per call.
pub fn read_double<S: ByteSource>(
    input: &mut BitReader<S>,
    exponent_bits: u32,
    significand_bits: u32,
) -> CodecResult<f64> {
    FloatCodec::<f64>::new(exponent_bits, significand_bits)?.decode(input)
}
