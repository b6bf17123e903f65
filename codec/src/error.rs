//! Error types for codec operations.

use std::fmt;

use bitstream::{BitError, ErrorClass};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding values.
#[derive(Debug)]
#[non_exhaustive]
pub enum CodecError {
    /// Bit cursor error (channel failure, truncated input, or cursor misuse).
    Bitstream(BitError),

    /// Exponent field width outside the supported range.
    InvalidExponentSize { bits: u32, min: u32, max: u32 },

    /// Significand field width outside the supported range.
    InvalidSignificandSize { bits: u32, min: u32, max: u32 },

    /// A normal exponent does not fit the narrow exponent width.
    ///
    /// The float codec reduces precision, never magnitude; values whose
    /// exponent falls outside the narrow normal range must be rejected.
    ExponentOutOfRange { unbiased: i32, exponent_bits: u32 },

    /// A variable-length quantity ran past the widest encodable value.
    InvalidVarint { max_bits: u32 },

    /// A container is too long for its fixed-width length prefix.
    LengthOverflow { length: u64, max: u64 },

    /// A decoded length does not fit the platform's address space.
    InvalidLength { length: u64 },

    /// A decoded UTF-16 sequence contained an unpaired surrogate.
    InvalidString { unit: u16 },

    /// A character is outside the repertoire of the chosen text encoding.
    UnencodableChar { ch: char },
}

impl CodecError {
    /// Maps to the two-way failure split of the cursor layer: call-site
    /// errors versus channel/data failures that end the session.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Bitstream(err) => err.class(),
            Self::InvalidExponentSize { .. }
            | Self::InvalidSignificandSize { .. }
            | Self::ExponentOutOfRange { .. }
            | Self::LengthOverflow { .. }
            | Self::UnencodableChar { .. } => ErrorClass::Precondition,
            Self::InvalidVarint { .. }
            | Self::InvalidLength { .. }
            | Self::InvalidString { .. } => ErrorClass::Io,
        }
    }

    /// Returns `true` for call-site errors that left the cursor untouched.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self.class(), ErrorClass::Precondition)
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(err) => write!(f, "bitstream error: {err}"),
            Self::InvalidExponentSize { bits, min, max } => {
                write!(f, "invalid exponent size {bits}, expected {min}..={max}")
            }
            Self::InvalidSignificandSize { bits, min, max } => {
                write!(f, "invalid significand size {bits}, expected {min}..={max}")
            }
            Self::ExponentOutOfRange {
                unbiased,
                exponent_bits,
            } => {
                write!(
                    f,
                    "exponent {unbiased} does not fit a {exponent_bits}-bit exponent field"
                )
            }
            Self::InvalidVarint { max_bits } => {
                write!(f, "variable-length quantity exceeds {max_bits} bits")
            }
            Self::LengthOverflow { length, max } => {
                write!(f, "length {length} exceeds the prefix maximum {max}")
            }
            Self::InvalidLength { length } => {
                write!(f, "decoded length {length} is not addressable")
            }
            Self::InvalidString { unit } => {
                write!(f, "unpaired surrogate 0x{unit:04X} in string data")
            }
            Self::UnencodableChar { ch } => {
                write!(f, "character {ch:?} is outside the text encoding repertoire")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BitError> for CodecError {
    fn from(err: BitError) -> Self {
        Self::Bitstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_exponent_size() {
        let err = CodecError::InvalidExponentSize {
            bits: 12,
            min: 2,
            max: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("2..=8"));
    }

    #[test]
    fn display_exponent_out_of_range() {
        let err = CodecError::ExponentOutOfRange {
            unbiased: 100,
            exponent_bits: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("5-bit"));
    }

    #[test]
    fn display_invalid_string() {
        let err = CodecError::InvalidString { unit: 0xD800 };
        assert!(err.to_string().contains("0xD800"));
    }

    #[test]
    fn bitstream_errors_keep_their_class() {
        let precondition = CodecError::from(BitError::InvalidSkip);
        assert_eq!(precondition.class(), ErrorClass::Precondition);

        let truncated = CodecError::from(BitError::UnexpectedEof {
            requested: 8,
            missing: 8,
        });
        assert_eq!(truncated.class(), ErrorClass::Io);
    }

    #[test]
    fn codec_error_classes() {
        assert!(CodecError::InvalidExponentSize {
            bits: 0,
            min: 2,
            max: 8
        }
        .is_precondition());
        assert!(CodecError::LengthOverflow { length: 9, max: 7 }.is_precondition());
        assert!(!CodecError::InvalidVarint { max_bits: 32 }.is_precondition());
        assert!(!CodecError::InvalidString { unit: 0xDC00 }.is_precondition());
    }

    #[test]
    fn bitstream_error_has_source() {
        use std::error::Error as _;
        let err = CodecError::from(BitError::InvalidBoundary);
        assert!(err.source().is_some());
    }
}
