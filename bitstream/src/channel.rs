//! The byte channel boundary consumed by the bit cursor.
//!
//! A channel supplies or accepts one byte at a time; end of data is a
//! distinct signal, not an error. Transports own all buffering and
//! blocking semantics; the cursor issues at most one byte operation per
//! bit operation that crosses a byte boundary.

use std::io;

/// A byte-oriented source: one byte per call, `None` at end of data.
pub trait ByteSource {
    /// Returns the next byte, `None` once the data is exhausted, or a
    /// transport error.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// A byte-oriented sink: one byte per call.
pub trait ByteSink {
    /// Accepts one byte.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Forwards any transport-level buffering. Idempotent.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Releases the transport. Idempotent; `write_byte` after `close` is
    /// a transport-defined condition.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Byte slices are consumed in place, the way [`io::Read`] treats them.
impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

impl ByteSink for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }
}

/// Adapts any [`io::Read`] stream (file, socket, buffered reader) to the
/// channel boundary. Wrap slow transports in a [`io::BufReader`]; this
/// adapter reads a single byte per call.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: io::Read> IoSource<R> {
    /// Wraps a reader.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

/// Adapts any [`io::Write`] stream to the channel boundary. Wrap slow
/// transports in a [`io::BufWriter`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    /// Wraps a writer.
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> ByteSink for IoSink<W> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_consumes_in_place() {
        let data = [1u8, 2, 3];
        let mut source: &[u8] = &data;
        assert_eq!(source.read_byte().unwrap(), Some(1));
        assert_eq!(source.read_byte().unwrap(), Some(2));
        assert_eq!(source.read_byte().unwrap(), Some(3));
        assert_eq!(source.read_byte().unwrap(), None);
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn vec_sink_appends() {
        let mut sink = Vec::new();
        sink.write_byte(0xAB).unwrap();
        sink.write_byte(0xCD).unwrap();
        sink.flush().unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        assert_eq!(sink, vec![0xAB, 0xCD]);
    }

    #[test]
    fn io_source_over_cursor() {
        let mut source = IoSource::new(io::Cursor::new(vec![7u8, 9]));
        assert_eq!(source.read_byte().unwrap(), Some(7));
        assert_eq!(source.read_byte().unwrap(), Some(9));
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn io_sink_over_vec() {
        let mut sink = IoSink::new(Vec::new());
        sink.write_byte(0x42).unwrap();
        sink.flush().unwrap();
        sink.close().unwrap();
        assert_eq!(sink.into_inner(), vec![0x42]);
    }
}
