//! Fixed-capacity string field.

use core::fmt;

use super::{Payload, take_mut};
use crate::domain::error::EncodeError;

/// A UTF-8 string stored in exactly `N` bytes, NUL-padded.
///
/// At most `N - 1` bytes of text are kept so the stored form always carries a
/// terminator. Longer input is cut at the last character boundary that fits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    /// Maximum number of text bytes.
    pub const MAX_LEN: usize = N.saturating_sub(1);

    /// An empty string.
    pub const fn empty() -> Self {
        Self { bytes: [0; N] }
    }

    /// Build from `s`, truncating if it does not fit.
    pub fn new(s: &str) -> Self {
        let mut out = Self::empty();
        out.set(s);
        out
    }

    /// Replace the contents with `s`.
    ///
    /// Returns `false` if `s` had to be truncated.
    pub fn set(&mut self, s: &str) -> bool {
        let mut end = s.len().min(Self::MAX_LEN);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.bytes = [0; N];
        self.bytes[..end].copy_from_slice(&s.as_bytes()[..end]);
        end == s.len()
    }

    /// The text up to the first NUL.
    pub fn as_str(&self) -> &str {
        let len = self.len();
        // contents are validated on construction and decode
        core::str::from_utf8(&self.bytes[..len]).unwrap_or_default()
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.bytes.iter().position(|&b| b == 0).unwrap_or(N)
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for FixedStr<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

impl<const N: usize> PartialEq<str> for FixedStr<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for FixedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<const N: usize> Payload for FixedStr<N> {
    const SIZE: usize = N;

    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
        take_mut(out, N)?.copy_from_slice(&self.bytes);
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; N] = bytes.get(..N)?.try_into().ok()?;
        let len = raw.iter().position(|&b| b == 0)?;
        core::str::from_utf8(&raw[..len]).ok()?;
        // normalize the tail so equal text compares equal
        let mut out = Self::empty();
        out.bytes[..len].copy_from_slice(&raw[..len]);
        Some(out)
    }
}
