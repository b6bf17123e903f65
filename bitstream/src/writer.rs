//! Bit-level writer for encoding packed binary data.

use crate::channel::ByteSink;
use crate::error::{BitError, BitResult};
use crate::{check_size, mask_low, MAX_FIELD_BITS};

/// A bit-level writer over a byte sink.
///
/// Bits are packed most-significant-bit first within each byte and within
/// each multi-bit field. A partial byte is buffered until 8 bits have
/// accumulated, then flushed to the sink; [`close`](Self::close) (or
/// [`finish`](Self::finish) for the in-memory writer) zero-pads and emits
/// any trailing partial byte.
#[derive(Debug)]
pub struct BitWriter<S: ByteSink> {
    sink: S,
    /// Current byte being assembled (not yet pushed to the sink).
    current_byte: u8,
    /// Number of bits written to `current_byte` (0-7).
    bit_count: u8,
    /// Bits written since creation or the last `reset`.
    bits_written: u64,
    /// Bit position of the last alignment point.
    align_mark: u64,
    closed: bool,
}

impl BitWriter<Vec<u8>> {
    /// Creates a writer over a fresh in-memory buffer.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// Creates an in-memory writer with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self::new(Vec::with_capacity(bytes))
    }

    /// Finishes writing and returns the byte buffer.
    ///
    /// If the last byte is incomplete, it is padded with zeros on the right.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.sink.push(self.current_byte << (8 - self.bit_count));
        }
        self.sink
    }

    /// Finishes writing and appends to the provided buffer.
    ///
    /// If the last byte is incomplete, it is padded with zeros on the right.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        if self.bit_count > 0 {
            self.sink.push(self.current_byte << (8 - self.bit_count));
        }
        buf.append(&mut self.sink);
    }
}

impl Default for BitWriter<Vec<u8>> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: ByteSink> BitWriter<S> {
    /// Creates a writer over the given byte sink.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current_byte: 0,
            bit_count: 0,
            bits_written: 0,
            align_mark: 0,
            closed: false,
        }
    }

    /// Returns the number of bits written since creation or the last
    /// [`reset`](Self::reset).
    #[must_use]
    pub const fn bits_written(&self) -> u64 {
        self.bits_written
    }

    fn emit_current(&mut self) -> BitResult<()> {
        self.sink.write_byte(self.current_byte)?;
        self.current_byte = 0;
        self.bit_count = 0;
        Ok(())
    }

    /// Writes a single bit (the unsigned 1-bit integer: `true` is 1).
    pub fn write_bool(&mut self, value: bool) -> BitResult<()> {
        self.current_byte = (self.current_byte << 1) | u8::from(value);
        self.bit_count += 1;
        self.bits_written += 1;
        if self.bit_count == 8 {
            self.emit_current()?;
        }
        Ok(())
    }

    /// Writes the low `bits` bits of `value`, MSB-first.
    ///
    /// High bits of `value` beyond `bits` are masked off; callers are
    /// expected to supply a value already within the field's codomain.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] unless `bits` is in `1..=64`,
    /// before anything is written. Channel failures surface as
    /// [`BitError::Io`] and leave the cursor state undefined.
    pub fn write_bits(&mut self, value: u64, bits: u32) -> BitResult<()> {
        check_size(bits, MAX_FIELD_BITS)?;
        let value = mask_low(value, bits);
        let mut remaining = bits;
        while remaining > 0 {
            let room = u32::from(8 - self.bit_count);
            let take = remaining.min(room);
            let chunk = (value >> (remaining - take)) & mask_low(u64::MAX, take);
            // take == 8 only when the current byte is empty, so the u16
            // shift never drops set bits.
            self.current_byte =
                ((u16::from(self.current_byte) << take) | chunk as u16) as u8;
            self.bit_count += take as u8;
            self.bits_written += u64::from(take);
            remaining -= take;
            if self.bit_count == 8 {
                self.emit_current()?;
            }
        }
        Ok(())
    }

    /// Writes `bits` zero bits without taking a value.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidSkip`] if `bits` is zero.
    pub fn skip(&mut self, bits: u64) -> BitResult<()> {
        if bits == 0 {
            return Err(BitError::InvalidSkip);
        }
        let mut remaining = bits;
        while remaining > 0 {
            let chunk = remaining.min(u64::from(MAX_FIELD_BITS)) as u32;
            self.write_bits(0, chunk)?;
            remaining -= u64::from(chunk);
        }
        Ok(())
    }

    /// Zero-pads to the next multiple of `boundary` bytes, counted from the
    /// last alignment point, and returns the number of padded bits.
    ///
    /// The returned count equals what the corresponding reader's
    /// [`align`](crate::BitReader::align) discards at the same point of the
    /// session, which makes it a cheap cross-check between the two sides.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBoundary`] if `boundary` is zero.
    pub fn align(&mut self, boundary: u32) -> BitResult<u64> {
        if boundary == 0 {
            return Err(BitError::InvalidBoundary);
        }
        let span = u64::from(boundary) * 8;
        let offset = (self.bits_written - self.align_mark) % span;
        let pad = if offset == 0 { 0 } else { span - offset };
        if pad > 0 {
            self.skip(pad)?;
        }
        self.align_mark = self.bits_written;
        Ok(pad)
    }

    /// Zero-pads to the next byte boundary. Equivalent to `align(1)`.
    pub fn align_to_byte(&mut self) -> BitResult<u64> {
        self.align(1)
    }

    /// Reinitializes the bit counters for reuse across independent frames,
    /// without touching the sink.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::ResetUnaligned`] if a partial byte is pending.
    pub fn reset(&mut self) -> BitResult<()> {
        if self.bit_count != 0 {
            return Err(BitError::ResetUnaligned {
                pending_bits: self.bit_count,
            });
        }
        self.bits_written = 0;
        self.align_mark = 0;
        Ok(())
    }

    /// Flushes completed bytes through the sink. The pending partial byte
    /// stays buffered; emitting it early would corrupt later writes.
    pub fn flush(&mut self) -> BitResult<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Zero-pads and emits any pending partial byte, then flushes and
    /// closes the sink. Idempotent.
    pub fn close(&mut self) -> BitResult<()> {
        if self.closed {
            return Ok(());
        }
        if self.bit_count > 0 {
            self.current_byte <<= 8 - self.bit_count;
            self.bit_count = 8;
            self.emit_current()?;
        }
        self.sink.flush()?;
        self.sink.close()?;
        self.closed = true;
        Ok(())
    }

    /// Consumes the writer and returns the sink. Call
    /// [`close`](Self::close) first; a pending partial byte is discarded.
    pub fn into_sink(self) -> S {
        self.sink
    }

    // Sized integer writes. Values are masked to the low `size` bits
    // (two's-complement truncation), lossless for values inside the
    // field's codomain.

    /// Writes a signed integer in `size` bits, `size` in 1..=32.
    pub fn write_signed(&mut self, size: u32, value: i32) -> BitResult<()> {
        check_size(size, 32)?;
        self.write_bits(u64::from(value as u32), size)
    }

    /// Writes an unsigned integer in `size` bits, `size` in 1..=31.
    pub fn write_unsigned(&mut self, size: u32, value: u32) -> BitResult<()> {
        check_size(size, 31)?;
        self.write_bits(u64::from(value), size)
    }

    /// Writes a signed long in `size` bits, `size` in 1..=64.
    pub fn write_signed_long(&mut self, size: u32, value: i64) -> BitResult<()> {
        check_size(size, 64)?;
        self.write_bits(value as u64, size)
    }

    /// Writes an unsigned long in `size` bits, `size` in 1..=63.
    pub fn write_unsigned_long(&mut self, size: u32, value: u64) -> BitResult<()> {
        check_size(size, 63)?;
        self.write_bits(value, size)
    }

    /// Writes a signed byte in `size` bits, `size` in 1..=8.
    pub fn write_byte(&mut self, size: u32, value: i8) -> BitResult<()> {
        check_size(size, 8)?;
        self.write_signed(size, i32::from(value))
    }

    /// Writes an unsigned byte in `size` bits, `size` in 1..=7.
    pub fn write_unsigned_byte(&mut self, size: u32, value: u8) -> BitResult<()> {
        check_size(size, 7)?;
        self.write_unsigned(size, u32::from(value))
    }

    /// Writes a signed short in `size` bits, `size` in 1..=16.
    pub fn write_short(&mut self, size: u32, value: i16) -> BitResult<()> {
        check_size(size, 16)?;
        self.write_signed(size, i32::from(value))
    }

    /// Writes an unsigned short in `size` bits, `size` in 1..=15.
    pub fn write_unsigned_short(&mut self, size: u32, value: u16) -> BitResult<()> {
        check_size(size, 15)?;
        self.write_unsigned(size, u32::from(value))
    }

    /// Writes a 16-bit character code unit in `size` bits, `size` in 1..=16.
    pub fn write_char(&mut self, size: u32, value: u16) -> BitResult<()> {
        check_size(size, 16)?;
        self.write_bits(u64::from(value), size)
    }

    /// Full-width passthrough: 8 bits.
    pub fn write_i8(&mut self, value: i8) -> BitResult<()> {
        self.write_bits(u64::from(value as u8), 8)
    }

    /// Full-width passthrough: 16 bits.
    pub fn write_i16(&mut self, value: i16) -> BitResult<()> {
        self.write_bits(u64::from(value as u16), 16)
    }

    /// Full-width passthrough: 32 bits.
    pub fn write_i32(&mut self, value: i32) -> BitResult<()> {
        self.write_bits(u64::from(value as u32), 32)
    }

    /// Full-width passthrough: 64 bits.
    pub fn write_i64(&mut self, value: i64) -> BitResult<()> {
        self.write_bits(value as u64, 64)
    }

    /// Full-width passthrough: a whole 16-bit character code unit.
    pub fn write_char16(&mut self, value: u16) -> BitResult<()> {
        self.write_bits(u64::from(value), 16)
    }
}
