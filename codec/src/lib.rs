//! Value codecs over the bitgrain cursor.
//!
//! This crate layers composable value encodings on top of the
//! `bitstream` primitives:
//!
//! - Custom-precision IEEE-754-shaped floats with caller-chosen exponent
//!   and significand widths
//! - Category-compressed float encodings (zero, infinity, NaN,
//!   subnormal) for when the category is known out of band
//! - Variable-length quantities for compact, unbounded counts
//! - A nullable wrapper and length-prefixed byte-array / string / list
//!   containers
//!
//! # Design Principles
//!
//! - **Codecs are values** - Immutable, cheap, safe to share and cache.
//! - **Composition over subclassing** - Wrappers take any [`Codec`].
//! - **Bounded decoding** - Counts and varints are validated before they
//!   drive allocation or iteration.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitWriter, BitReader};
//! use codec::{Codec, FloatCodec, nullable};
//!
//! let half = FloatCodec::<f32>::new(5, 10)?;
//! let maybe_half = nullable(half);
//!
//! let mut writer = BitWriter::in_memory();
//! maybe_half.encode(&mut writer, &Some(1.5))?;
//! maybe_half.encode(&mut writer, &None)?;
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes[..]);
//! assert_eq!(maybe_half.decode(&mut reader)?, Some(1.5));
//! assert_eq!(maybe_half.decode(&mut reader)?, None);
//! # Ok::<(), codec::CodecError>(())
//! ```

mod cache;
mod compressed;
mod container;
mod error;
mod float;
mod int;
mod nullable;
mod traits;
mod vlq;

pub use cache::FloatCodecCache;
pub use compressed::{InfinityCodec, NanCodec, SubnormalCodec, ZeroCodec};
pub use container::{AsciiMode, AsciiStringCodec, BytesCodec, LengthPrefix, ListCodec, Utf16StringCodec};
pub use error::{CodecError, CodecResult};
pub use float::{
    read_double, read_float, write_double, write_float, FloatCodec, IeeeFloat,
    MIN_EXPONENT_BITS, MIN_SIGNIFICAND_BITS,
};
pub use int::{BoolCodec, CharCodec, SIntCodec, SLongCodec, UIntCodec, ULongCodec};
pub use nullable::{nullable, Nullable};
pub use traits::Codec;
pub use vlq::{read_vlq_u32, read_vlq_u64, write_vlq_u32, write_vlq_u64, VlqCodec};
