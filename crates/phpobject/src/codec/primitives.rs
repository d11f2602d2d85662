//! Byte sources and sinks for the serialize format.
//!
//! Decoding reads strictly forward through a [`Source`]: either a byte slice
//! ([`Reader`]) or a blocking [`std::io::Read`] ([`IoReader`]). Encoding
//! appends to a [`Writer`].

use std::io::Read;

use crate::error::DecodeError;

// =============================================================================
// DECODING
// =============================================================================

/// Sequential byte source.
///
/// Implementations never seek backward. End of input and read failures are
/// both reported as `None`; the provided methods turn them into
/// [`DecodeError::Truncated`].
pub trait Source {
    /// Returns the next byte, or `None` at end of input.
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns the next `n` bytes, or `None` if fewer remain.
    fn take_bytes(&mut self, n: usize) -> Option<Vec<u8>>;

    /// Returns the number of bytes consumed so far.
    fn position(&self) -> usize;

    /// Reads a single byte.
    #[inline]
    fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        self.next_byte().ok_or(DecodeError::Truncated { context })
    }

    /// Reads exactly n bytes.
    #[inline]
    fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<Vec<u8>, DecodeError> {
        self.take_bytes(n).ok_or(DecodeError::Truncated { context })
    }
}

/// Reader over an in-memory byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

impl Source for Reader<'_> {
    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    #[inline]
    fn take_bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes.to_vec())
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// Reader over a blocking [`Read`] implementation.
///
/// Bytes are pulled one read call at a time so nothing past the decoded
/// value is consumed. Wrap unbuffered readers in [`std::io::BufReader`].
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
    pos: usize,
}

impl<R: Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for IoReader<R> {
    fn next_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf).ok()?;
        self.pos += 1;
        Some(buf[0])
    }

    fn take_bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        // grows with the data actually read, not with the declared length
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(n as u64).read_to_end(&mut buf).ok()?;
        self.pos += read;
        (read == n).then_some(buf)
    }

    fn position(&self) -> usize {
        self.pos
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding values.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned integer as ASCII decimal.
    #[inline]
    pub fn write_usize(&mut self, value: usize) {
        self.write_decimal(false, value as u64);
    }

    /// Writes a signed integer as ASCII decimal.
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.write_decimal(value < 0, value.unsigned_abs());
    }

    fn write_decimal(&mut self, negative: bool, mut value: u64) {
        // Stack buffer: sign plus at most 20 digits for u64
        let mut buf = [0u8; 21];
        let mut start = buf.len();
        loop {
            start -= 1;
            buf[start] = b'0' + (value % 10) as u8;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        if negative {
            start -= 1;
            buf[start] = b'-';
        }
        self.buf.extend_from_slice(&buf[start..]);
    }
}
