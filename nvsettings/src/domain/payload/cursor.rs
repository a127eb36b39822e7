//! Field-by-field payload composition.

use super::{Payload, take_mut};
use crate::domain::error::EncodeError;

/// Sequential writer over a payload buffer.
pub struct PayloadWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> PayloadWriter<'a> {
    /// Start writing at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Encode `value` at the current position and advance past it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit in the remaining space.
    pub fn put<T: Payload>(&mut self, value: &T) -> Result<(), EncodeError> {
        let rest = self.buf.get_mut(self.pos..).unwrap_or_default();
        value.encode(take_mut(rest, T::SIZE)?)?;
        self.pos += T::SIZE;
        Ok(())
    }

    /// Zero-fill `n` bytes (padding or reserved fields) and advance past them.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than `n` bytes remain.
    pub fn pad(&mut self, n: usize) -> Result<(), EncodeError> {
        let rest = self.buf.get_mut(self.pos..).unwrap_or_default();
        take_mut(rest, n)?.fill(0);
        self.pos += n;
        Ok(())
    }

    /// Bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Sequential reader over a payload buffer.
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    /// Start reading at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Decode a `T` at the current position and advance past it.
    ///
    /// Returns `None` if too few bytes remain or the bytes are not a valid `T`.
    pub fn get<T: Payload>(&mut self) -> Option<T> {
        let raw = self.buf.get(self.pos..)?.get(..T::SIZE)?;
        let value = T::decode(raw)?;
        self.pos += T::SIZE;
        Some(value)
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Option<()> {
        self.buf.get(self.pos..)?.get(..n)?;
        self.pos += n;
        Some(())
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}
