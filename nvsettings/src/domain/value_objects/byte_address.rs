//! Type-safe byte address value object.

use core::fmt;

/// An absolute byte address inside a byte store.
///
/// This value object provides type safety to prevent mixing store addresses
/// with lengths, offsets inside a record, or other integer types.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteAddress(u32);

impl ByteAddress {
    /// Create a new byte address.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvsettings::domain::ByteAddress;
    ///
    /// let addr = ByteAddress::new(0x40);
    /// assert_eq!(addr.value(), 0x40);
    /// ```
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying u32 value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Add an offset to this address.
    #[inline]
    pub const fn add(self, offset: u32) -> Self {
        Self(self.0.saturating_add(offset))
    }

    /// Calculate the distance from `other` to this address.
    #[inline]
    pub const fn offset_from(self, other: Self) -> u32 {
        self.0.saturating_sub(other.0)
    }

    /// Round up to the next multiple of `alignment`, or `None` if that lies
    /// beyond the 32-bit address space.
    ///
    /// `alignment` must be a power of two; [`AllocatorConfig`](super::AllocatorConfig)
    /// guarantees this for every alignment it hands out.
    #[inline]
    pub const fn align_up(self, alignment: u32) -> Option<Self> {
        let mask = alignment - 1;
        match self.0.checked_add(mask) {
            Some(v) => Some(Self(v & !mask)),
            None => None,
        }
    }
}

impl fmt::Display for ByteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr({:#06x})", self.0)
    }
}

impl From<u32> for ByteAddress {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}
