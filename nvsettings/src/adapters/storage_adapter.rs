//! Bridge from `embedded-storage` to the byte store port.
//!
//! Any [`embedded_storage::Storage`] works: EEPROM drivers that implement it
//! directly, or NOR flash wrapped in
//! [`RmwNorFlashStorage`](embedded_storage::nor_flash::RmwNorFlashStorage),
//! which does the read-modify-erase-write cycle so settings can be written
//! in place.
//!
//! # Example
//!
//! ```ignore
//! use embedded_storage::nor_flash::RmwNorFlashStorage;
//! use nvsettings::adapters::StorageAdapter;
//!
//! let mut merge_buffer = [0u8; 4096];
//! let flash = RmwNorFlashStorage::new(esp_flash, &mut merge_buffer);
//! let mut store = StorageAdapter::new(flash);
//! ```

use core::fmt;

use embedded_storage::{ReadStorage, Storage};

use crate::domain::{ByteAddress, ByteStore};

/// Error type for [`StorageAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAdapterError<E> {
    /// The access ran past the end of the storage.
    OutOfRange {
        /// First byte of the access.
        address: ByteAddress,
        /// Length of the access.
        len: usize,
    },
    /// The driver failed.
    Storage(E),
}

impl<E: fmt::Debug> fmt::Display for StorageAdapterError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { address, len } => {
                write!(f, "Access of {} bytes at {} is out of range", len, address)
            }
            Self::Storage(e) => write!(f, "Storage driver error: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for StorageAdapterError<E> {}

/// Adapter that exposes an `embedded_storage::Storage` as a [`ByteStore`].
pub struct StorageAdapter<S> {
    storage: S,
}

impl<S> StorageAdapter<S> {
    /// Wrap `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get a reference to the underlying storage.
    pub fn inner(&self) -> &S {
        &self.storage
    }

    /// Get a mutable reference to the underlying storage.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Consume the adapter and return the underlying storage.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: Storage> StorageAdapter<S> {
    fn check(&self, address: u32, len: usize) -> Result<(), StorageAdapterError<S::Error>> {
        let end = (address as usize).checked_add(len);
        if end.is_some_and(|end| end <= self.storage.capacity()) {
            Ok(())
        } else {
            Err(StorageAdapterError::OutOfRange {
                address: ByteAddress::new(address),
                len,
            })
        }
    }
}

impl<S> ByteStore for StorageAdapter<S>
where
    S: Storage,
    S::Error: fmt::Debug,
{
    type Error = StorageAdapterError<S::Error>;

    fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    fn read(&mut self, address: u32, dest: &mut [u8]) -> Result<(), Self::Error> {
        self.check(address, dest.len())?;
        self.storage
            .read(address, dest)
            .map_err(StorageAdapterError::Storage)
    }

    fn write(&mut self, address: u32, src: &[u8]) -> Result<(), Self::Error> {
        self.check(address, src.len())?;
        self.storage
            .write(address, src)
            .map_err(StorageAdapterError::Storage)
    }
}
