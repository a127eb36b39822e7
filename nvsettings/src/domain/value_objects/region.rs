//! Claimed address range of one slot.

use super::{ByteAddress, SlotId};
use core::fmt;

/// A contiguous `[base, base + len)` range reserved for a slot.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    slot: SlotId,
    base: ByteAddress,
    len: u32,
}

impl Region {
    /// Create a region. Only the allocator hands these out.
    pub(crate) const fn new(slot: SlotId, base: ByteAddress, len: u32) -> Self {
        Self { slot, base, len }
    }

    /// The slot that owns this region.
    #[inline]
    pub const fn slot(&self) -> SlotId {
        self.slot
    }

    /// First byte of the region.
    #[inline]
    pub const fn base(&self) -> ByteAddress {
        self.base
    }

    /// Length of the region in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// Whether the region is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the region.
    #[inline]
    pub const fn end(&self) -> ByteAddress {
        self.base.add(self.len)
    }

    /// Check whether `addr` falls inside the region.
    pub const fn contains(&self, addr: ByteAddress) -> bool {
        addr.value() >= self.base.value() && addr.value() < self.end().value()
    }

    /// Check whether two regions share at least one byte.
    pub const fn overlaps(&self, other: &Region) -> bool {
        self.base.value() < other.end().value() && other.base.value() < self.end().value()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.slot, self.base, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(base: u32, len: u32) -> Region {
        Region::new(SlotId::named("t"), ByteAddress::new(base), len)
    }

    #[test]
    fn test_region_bounds() {
        let r = region(8, 4);
        assert_eq!(r.end().value(), 12);
        assert!(r.contains(ByteAddress::new(8)));
        assert!(r.contains(ByteAddress::new(11)));
        assert!(!r.contains(ByteAddress::new(12)));
        assert!(!r.contains(ByteAddress::new(7)));
    }

    #[test]
    fn test_region_overlap() {
        assert!(!region(0, 8).overlaps(&region(8, 4)));
        assert!(region(0, 9).overlaps(&region(8, 4)));
        assert!(region(8, 4).overlaps(&region(0, 9)));
        assert!(!region(0, 0).overlaps(&region(0, 4)));
    }
}
