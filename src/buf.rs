use bytes::Bytes;

use crate::error::ReadKind;
use crate::{ParseError, ParseErrorKind, ParseResult};

/// A position-tracked view over a growable byte buffer.
///
/// Reads are bounds checked and big-endian. Buffer reads hand out slices of
/// the shared storage without copying. Writes land at the current position
/// and grow the buffer by exactly the shortfall when they run past its end;
/// existing bytes are overwritten in place, never truncated. Writing to
/// storage that is still shared with earlier reads copies it first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    buf: Bytes,
    position: usize,
}

impl ByteCursor {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        ByteCursor {
            buf: buf.into(),
            position: 0,
        }
    }

    /// Current read/write offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total size of the backing buffer.
    pub fn available(&self) -> usize {
        self.buf.len()
    }

    /// Bytes between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves the position back to the start without touching the contents.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        Vec::from(self.buf)
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf
    }

    /// Returns the byte at the current position without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.position).copied()
    }

    fn take<const N: usize>(&mut self, kind: ReadKind) -> ParseResult<[u8; N]> {
        self.ensure(N, kind)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.position..self.position + N]);
        self.position += N;
        Ok(out)
    }

    fn ensure(&self, count: usize, kind: ReadKind) -> ParseResult<()> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(ParseError::new(ParseErrorKind::InsufficientData {
                kind,
                missing: count - remaining,
            }));
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> ParseResult<u8> {
        let [b] = self.take::<1>(ReadKind::U8)?;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> ParseResult<u16> {
        Ok(u16::from_be_bytes(self.take::<2>(ReadKind::U16)?))
    }

    pub fn read_u24(&mut self) -> ParseResult<u32> {
        let [a, b, c] = self.take::<3>(ReadKind::U24)?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    pub fn read_u32(&mut self) -> ParseResult<u32> {
        Ok(u32::from_be_bytes(self.take::<4>(ReadKind::U32)?))
    }

    /// Returns the next `count` bytes as a slice of the cursor's storage.
    pub fn read_buffer(&mut self, count: usize) -> ParseResult<Bytes> {
        self.ensure(count, ReadKind::Buffer)?;
        let out = self.buf.slice(self.position..self.position + count);
        self.position += count;
        Ok(out)
    }

    pub fn read_remaining(&mut self) -> Bytes {
        let out = self.buf.slice(self.position..);
        self.position = self.buf.len();
        out
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_buffer(&[value]);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_buffer(&value.to_be_bytes());
    }

    /// Writes the low 24 bits of `value`.
    pub fn write_u24(&mut self, value: u32) {
        self.write_buffer(&value.to_be_bytes()[1..]);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_buffer(&value.to_be_bytes());
    }

    pub fn write_buffer(&mut self, data: &[u8]) {
        let start = self.position;
        let end = start + data.len();
        // Unshared storage converts to a Vec in place.
        let mut buf = Vec::from(std::mem::take(&mut self.buf));
        if end > buf.len() {
            buf.resize(end, 0);
        }
        buf[start..end].copy_from_slice(data);
        self.buf = Bytes::from(buf);
        self.position = end;
    }
}

impl From<Bytes> for ByteCursor {
    fn from(data: Bytes) -> Self {
        ByteCursor::new(data)
    }
}
