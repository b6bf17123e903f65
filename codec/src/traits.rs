//! The minimal read/write capability every value codec satisfies.

use bitstream::{BitReader, BitWriter, ByteSink, ByteSource};

use crate::error::CodecResult;

/// A bidirectional value encoding over the bit cursor.
///
/// Codecs are immutable values parameterized at construction; a codec for
/// fixed parameters can be shared freely across sessions and threads.
/// Wrappers such as [`Nullable`](crate::Nullable) and
/// [`ListCodec`](crate::ListCodec) compose over this trait instead of
/// subclassing concrete codecs.
pub trait Codec {
    /// The decoded value type.
    type Value;

    /// Encodes `value` onto the cursor.
    fn encode<S: ByteSink>(
        &self,
        out: &mut BitWriter<S>,
        value: &Self::Value,
    ) -> CodecResult<()>;

    /// Decodes one value from the cursor.
    fn decode<S: ByteSource>(&self, input: &mut BitReader<S>) -> CodecResult<Self::Value>;
}
