//! Error types for bit cursor operations.

use std::fmt;
use std::io;

/// Result type for bit cursor operations.
pub type BitResult<T> = Result<T, BitError>;

/// The two disjoint failure classes of a bit cursor operation.
///
/// Precondition failures are programmer errors at the call site and are
/// reported before any bit is written or consumed. I/O failures come from
/// the underlying byte channel (including premature end of data); after one
/// the cursor state is undefined and the session must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Invalid argument or cursor misuse; nothing was written or consumed.
    Precondition,
    /// Channel failure or truncated input; the session is unusable.
    Io,
}

/// Errors that can occur during bit-level encoding/decoding.
#[derive(Debug)]
#[non_exhaustive]
pub enum BitError {
    /// Bit count outside the valid range for the operation.
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: u32,
        /// Maximum allowed bits for this operation (minimum is always 1).
        max_bits: u32,
    },

    /// `skip` was called with a bit count of zero.
    InvalidSkip,

    /// `align` was called with a byte boundary of zero.
    InvalidBoundary,

    /// `reset` was called while a partial byte was pending.
    ResetUnaligned {
        /// Bits pending in the current byte (1-7).
        pending_bits: u8,
    },

    /// The channel signaled end of data while bits were still required.
    UnexpectedEof {
        /// Total bits requested by the failing operation.
        requested: u64,
        /// Bits still missing when the channel ended.
        missing: u64,
    },

    /// The underlying byte channel failed.
    Io(io::Error),
}

impl BitError {
    /// Returns which of the two failure classes this error belongs to.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidBitCount { .. }
            | Self::InvalidSkip
            | Self::InvalidBoundary
            | Self::ResetUnaligned { .. } => ErrorClass::Precondition,
            Self::UnexpectedEof { .. } | Self::Io(_) => ErrorClass::Io,
        }
    }

    /// Returns `true` for call-site errors that left the cursor untouched.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self.class(), ErrorClass::Precondition)
    }
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "invalid bit count {bits}, expected 1..={max_bits}")
            }
            Self::InvalidSkip => {
                write!(f, "skip requires a positive bit count")
            }
            Self::InvalidBoundary => {
                write!(f, "alignment requires a positive byte boundary")
            }
            Self::ResetUnaligned { pending_bits } => {
                write!(
                    f,
                    "reset on an unaligned writer: {pending_bits} bits pending in the current byte"
                )
            }
            Self::UnexpectedEof { requested, missing } => {
                write!(
                    f,
                    "unexpected end of input: requested {requested} bits, {missing} still missing"
                )
            }
            Self::Io(err) => write!(f, "byte channel error: {err}"),
        }
    }
}

impl std::error::Error for BitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BitError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
