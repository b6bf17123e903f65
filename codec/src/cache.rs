//! Size-keyed sharing of float codecs.
//!
//! Codecs are cheap immutable values, so constructing one per call is
//! always correct; a cache only saves the construction and validation
//! work on hot paths. The cache is an explicitly owned map with
//! caller-controlled lifetime, safe for concurrent use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::CodecResult;
use crate::float::{FloatCodec, IeeeFloat};

/// A lazily filled, thread-safe map from `(exponent_bits,
/// significand_bits)` to shared [`FloatCodec`] instances.
///
/// A cached codec behaves identically to a freshly constructed one, and
/// invalid widths fail exactly as direct construction does.
#[derive(Debug, Default)]
pub struct FloatCodecCache<F: IeeeFloat> {
    codecs: Mutex<HashMap<(u32, u32), Arc<FloatCodec<F>>>>,
}

impl<F: IeeeFloat> FloatCodecCache<F> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            codecs: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the codec for the given widths, constructing it on first
    /// use.
    ///
    /// # Errors
    ///
    /// Width validation errors are the same as [`FloatCodec::new`].
    pub fn get(&self, exponent_bits: u32, significand_bits: u32) -> CodecResult<Arc<FloatCodec<F>>> {
        let mut codecs = self
            .codecs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(codec) = codecs.get(&(exponent_bits, significand_bits)) {
            return Ok(Arc::clone(codec));
        }
        let codec = Arc::new(FloatCodec::new(exponent_bits, significand_bits)?);
        codecs.insert((exponent_bits, significand_bits), Arc::clone(&codec));
        Ok(codec)
    }

    /// Number of distinct parameter pairs cached so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all cached codecs; outstanding `Arc`s stay valid.
    pub fn clear(&self) {
        self.codecs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::traits::Codec;
    use bitstream::{BitReader, BitWriter};

    #[test]
    fn returns_the_same_instance() {
        let cache = FloatCodecCache::<f32>::new();
        let a = cache.get(8, 23).unwrap();
        let b = cache.get(8, 23).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let c = cache.get(5, 10).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cached_codec_matches_fresh_behavior() {
        let cache = FloatCodecCache::<f64>::new();
        let cached = cache.get(11, 52).unwrap();
        let fresh = FloatCodec::<f64>::new(11, 52).unwrap();

        let value = -123.456f64;
        let mut writer_cached = BitWriter::in_memory();
        cached.encode(&mut writer_cached, &value).unwrap();
        let mut writer_fresh = BitWriter::in_memory();
        fresh.encode(&mut writer_fresh, &value).unwrap();
        assert_eq!(writer_cached.finish(), writer_fresh.finish());
    }

    #[test]
    fn invalid_widths_fail_like_construction() {
        let cache = FloatCodecCache::<f32>::new();
        assert!(matches!(
            cache.get(1, 23),
            Err(CodecError::InvalidExponentSize { .. })
        ));
        assert!(cache.is_empty(), "failed lookups must not be cached");
    }

    #[test]
    fn shared_across_threads() {
        let cache = std::sync::Arc::new(FloatCodecCache::<f32>::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let codec = cache.get(6, 12).unwrap();
                    let mut writer = BitWriter::in_memory();
                    codec.encode(&mut writer, &1.25f32).unwrap();
                    let bytes = writer.finish();
                    let mut reader = BitReader::new(&bytes[..]);
                    assert_eq!(codec.decode(&mut reader).unwrap(), 1.25);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_keeps_outstanding_arcs_valid() {
        let cache = FloatCodecCache::<f32>::new();
        let codec = cache.get(8, 23).unwrap();
        cache.clear();
        assert!(cache.is_empty());

        let mut writer = BitWriter::in_memory();
        codec.encode(&mut writer, &2.0f32).unwrap();
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(codec.decode(&mut reader).unwrap(), 2.0);
    }
}
