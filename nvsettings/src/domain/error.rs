//! Domain-level errors.
//!
//! Two families live here. [`StoreError`] and [`AllocError`] are real
//! failures that are propagated to the caller. [`DecodeError`] describes why a
//! stored record cannot be trusted; the manager turns it into a
//! [`LoadOutcome`](crate::domain::LoadOutcome) and falls back to defaults
//! instead of failing.

use crate::domain::value_objects::{ByteAddress, SlotId};
use core::fmt;

/// Why a byte block is not a usable record.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The magic tag is absent: the region was never written or holds foreign data.
    MissingMagic,

    /// The header claims more payload than the block holds.
    Truncated {
        /// Bytes the header says the record occupies.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The stored checksum does not match the record contents.
    ChecksumMismatch {
        /// Checksum found in the header.
        stored: u32,
        /// Checksum computed over the record.
        computed: u32,
    },

    /// The record is intact but was written under another schema version.
    VersionMismatch {
        /// Version in the header.
        stored: u16,
        /// Version the caller expects.
        expected: u16,
    },

    /// The record is intact and versioned correctly but its payload length
    /// differs from the payload type's size.
    LengthMismatch {
        /// Payload length in the header.
        stored: u16,
        /// Payload size of the current type.
        expected: usize,
    },

    /// The payload bytes do not form a valid value of the payload type.
    InvalidPayload,
}

impl DecodeError {
    /// Check if the error means the stored data is damaged (as opposed to
    /// absent or written by another firmware schema).
    #[inline]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::Truncated { .. } | Self::ChecksumMismatch { .. })
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMagic => write!(f, "No record present (magic tag missing)"),
            Self::Truncated { needed, available } => write!(
                f,
                "Record truncated: needs {} bytes, {} available",
                needed, available
            ),
            Self::ChecksumMismatch { stored, computed } => write!(
                f,
                "Checksum mismatch: stored {:#010x}, computed {:#010x}",
                stored, computed
            ),
            Self::VersionMismatch { stored, expected } => write!(
                f,
                "Schema version mismatch: stored v{}, expected v{}",
                stored, expected
            ),
            Self::LengthMismatch { stored, expected } => write!(
                f,
                "Payload length mismatch: stored {} bytes, expected {}",
                stored, expected
            ),
            Self::InvalidPayload => write!(f, "Payload bytes are not a valid value"),
        }
    }
}

impl core::error::Error for DecodeError {}

/// Why a payload could not be serialized.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// The output buffer is smaller than the encoded form.
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// The payload does not fit the record's 16-bit length field.
    PayloadTooLarge {
        /// Payload size in bytes.
        size: usize,
    },

    /// The payload's serializer rejected the value.
    Serialize,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, available } => write!(
                f,
                "Buffer too small: needs {} bytes, {} available",
                needed, available
            ),
            Self::PayloadTooLarge { size } => {
                write!(f, "Payload of {} bytes exceeds the record length field", size)
            }
            Self::Serialize => write!(f, "Payload serialization failed"),
        }
    }
}

impl core::error::Error for EncodeError {}

/// Errors from reserving regions.
///
/// All of these are fatal at registration time: firmware must not continue
/// with a layout it could not build.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
    /// The reservation does not fit in the remaining capacity.
    CapacityExceeded {
        /// Slot being registered.
        slot: SlotId,
        /// Bytes requested (including alignment padding).
        requested: u32,
        /// Bytes left in the store.
        available: u32,
    },

    /// The slot was already registered.
    DuplicateSlot(SlotId),

    /// The allocator's slot table has no free entries.
    TableFull {
        /// Maximum number of slots.
        limit: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                slot,
                requested,
                available,
            } => write!(
                f,
                "Capacity exceeded reserving {}: requested {} bytes, {} available",
                slot, requested, available
            ),
            Self::DuplicateSlot(slot) => write!(f, "{} is already registered", slot),
            Self::TableFull { limit } => write!(f, "Slot table full ({} slots)", limit),
        }
    }
}

impl core::error::Error for AllocError {}

/// Errors that can occur while loading or saving through a byte store.
///
/// `E` is the store's own error type.
#[derive(Debug)]
#[non_exhaustive]
pub enum StoreError<E> {
    /// The access falls outside the store's capacity.
    OutOfRange {
        /// First byte of the access.
        address: ByteAddress,
        /// Length of the access.
        len: usize,
        /// Store capacity.
        capacity: usize,
    },

    /// The store failed to read.
    Read(E),

    /// The store failed to write. The write may have been partial.
    StorageWrite(E),

    /// The payload could not be encoded.
    Encode(EncodeError),
}

impl<E: fmt::Display> fmt::Display for StoreError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                address,
                len,
                capacity,
            } => write!(
                f,
                "Access of {} bytes at {} exceeds capacity {}",
                len, address, capacity
            ),
            Self::Read(e) => write!(f, "Storage read error: {}", e),
            Self::StorageWrite(e) => write!(f, "Storage write error: {}", e),
            Self::Encode(e) => write!(f, "Encode error: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for StoreError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<EncodeError> for StoreError<E> {
    fn from(err: EncodeError) -> Self {
        StoreError::Encode(err)
    }
}
