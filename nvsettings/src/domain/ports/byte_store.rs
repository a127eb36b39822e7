//! ByteStore port - secondary (driven) port for byte-level non-volatile I/O.
//!
//! This port describes EEPROM, or flash that emulates EEPROM: any address can
//! be read or written without erasing first. Adapters implement it to connect
//! the domain to an actual memory driver.

use core::fmt;

/// Port for byte-addressable non-volatile memory.
///
/// ```text
/// ┌─────────────────────┐
/// │   Domain Layer      │
/// │ (SettingsManager)   │
/// └──────────┬──────────┘
///            │ depends on
///            ▼
/// ┌─────────────────────┐
/// │   ByteStore Port    │  ◄── This trait
/// └──────────┬──────────┘
///            │ implemented by
///            ▼
/// ┌─────────────────────┐
/// │  Adapter Layer      │
/// │ (RamStore, ...)     │
/// └─────────────────────┘
/// ```
///
/// Operations are synchronous and run to completion. The domain checks every
/// access against [`capacity`](ByteStore::capacity) before calling
/// `read`/`write`, so implementations only see in-range requests from it; they
/// should still reject out-of-range requests from other callers.
///
/// No locking is done on either side of this trait. If an interrupt handler
/// can re-enter a store that the main context is using, the caller has to
/// serialize access.
pub trait ByteStore {
    /// The error type for store operations.
    type Error: fmt::Debug + fmt::Display;

    /// Total addressable size in bytes.
    fn capacity(&self) -> usize;

    /// Read `dest.len()` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the access is out of range or the device fails.
    fn read(&mut self, address: u32, dest: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `src` starting at `address`.
    ///
    /// A failed write may have been partially applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the access is out of range or the device fails.
    fn write(&mut self, address: u32, src: &[u8]) -> Result<(), Self::Error>;
}

impl<T: ByteStore + ?Sized> ByteStore for &mut T {
    type Error = T::Error;

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read(&mut self, address: u32, dest: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(address, dest)
    }

    fn write(&mut self, address: u32, src: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, src)
    }
}
