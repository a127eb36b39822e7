//! In-memory byte store.

use core::fmt;

use crate::domain::{ByteAddress, ByteStore};

/// Value of an erased EEPROM cell.
pub const ERASED_BYTE: u8 = 0xFF;

/// Error type for [`RamStore`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamStoreError {
    /// The access ran past the end of the store.
    OutOfRange {
        /// First byte of the access.
        address: ByteAddress,
        /// Length of the access.
        len: usize,
    },
}

impl fmt::Display for RamStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { address, len } => {
                write!(f, "Access of {} bytes at {} is out of range", len, address)
            }
        }
    }
}

impl core::error::Error for RamStoreError {}

/// A `CAP`-byte store held in RAM.
///
/// Starts out erased (every byte `0xFF`), like a blank EEPROM.
#[derive(Clone)]
pub struct RamStore<const CAP: usize> {
    data: [u8; CAP],
}

impl<const CAP: usize> RamStore<CAP> {
    /// Create an erased store.
    pub const fn new() -> Self {
        Self {
            data: [ERASED_BYTE; CAP],
        }
    }

    /// Create a store holding `data`.
    pub const fn from_bytes(data: [u8; CAP]) -> Self {
        Self { data }
    }

    /// Raw contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; CAP] {
        &self.data
    }

    /// Raw contents, mutable. Handy for simulating corruption.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8; CAP] {
        &mut self.data
    }

    /// Erase every byte back to `0xFF`.
    pub fn erase(&mut self) {
        self.data.fill(ERASED_BYTE);
    }

    fn span(&self, address: u32, len: usize) -> Result<core::ops::Range<usize>, RamStoreError> {
        let start = address as usize;
        match start.checked_add(len) {
            Some(end) if end <= CAP => Ok(start..end),
            _ => Err(RamStoreError::OutOfRange {
                address: ByteAddress::new(address),
                len,
            }),
        }
    }
}

impl<const CAP: usize> Default for RamStore<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> fmt::Debug for RamStore<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RamStore").field("capacity", &CAP).finish()
    }
}

impl<const CAP: usize> ByteStore for RamStore<CAP> {
    type Error = RamStoreError;

    fn capacity(&self) -> usize {
        CAP
    }

    fn read(&mut self, address: u32, dest: &mut [u8]) -> Result<(), Self::Error> {
        let span = self.span(address, dest.len())?;
        dest.copy_from_slice(&self.data[span]);
        Ok(())
    }

    fn write(&mut self, address: u32, src: &[u8]) -> Result<(), Self::Error> {
        let span = self.span(address, src.len())?;
        self.data[span].copy_from_slice(src);
        Ok(())
    }
}
