//! Presence-flag composition over any codec.

use bitstream::{BitReader, BitWriter, ByteSink, ByteSource};

use crate::error::CodecResult;
use crate::traits::Codec;

/// Wraps a codec with a 1-bit presence flag.
///
/// `None` writes a single 0 bit and nothing else; `Some` writes a 1 bit
/// followed by the payload. The wrapped codec is never invoked for an
/// absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nullable<C> {
    inner: C,
}

impl<C> Nullable<C> {
    /// Wraps `inner`.
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Returns the wrapped codec.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

/// Shorthand for [`Nullable::new`].
pub const fn nullable<C: Codec>(inner: C) -> Nullable<C> {
    Nullable::new(inner)
}

impl<C: Codec> Codec for Nullable<C> {
    type Value = Option<C::Value>;

    fn encode<S: ByteSink>(
        &self,
        out: &mut BitWriter<S>,
        value: &Option<C::Value>,
    ) -> CodecResult<()> {
        match value {
            Some(payload) => {
                out.write_bool(true)?;
                self.inner.encode(out, payload)
            }
            None => {
                out.write_bool(false)?;
                Ok(())
            }
        }
    }

    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<Option<C::Value>> {
        if input.read_bool()? {
            Ok(Some(self.inner.decode(input)?))
        } else {
            Ok(None)
        }
    }
}
