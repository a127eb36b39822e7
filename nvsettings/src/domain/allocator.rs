//! RegionAllocator domain service - deterministic slot layout.
//!
//! Slots are laid out in registration order, each starting where the
//! previous one ended (rounded up to the configured alignment). Nothing about
//! the layout is stored on the device: every boot rebuilds the same table from
//! the same registration calls.
//!
//! Resizing a slot between firmware versions shifts every slot registered
//! after it. The allocator cannot see that; the codec catches it later as a
//! missing magic tag or checksum failure. Bump the schema version and keep
//! the registered size stable instead of resizing in place.

use crate::domain::{
    error::AllocError,
    ports::ByteStore,
    value_objects::{AllocatorConfig, ByteAddress, Region, SlotId},
};

/// Allocation table for up to `N` slots.
///
/// The table is an explicit value owned by the application root and lent to
/// each manager at registration time; there is no global instance.
///
/// # Examples
///
/// ```
/// use nvsettings::domain::{AllocatorConfig, RegionAllocator, SlotId};
///
/// let mut allocator = RegionAllocator::<4>::new(64, AllocatorConfig::new(0));
/// let a = allocator.reserve(SlotId::named("A"), 8).unwrap();
/// let b = allocator.reserve(SlotId::named("B"), 4).unwrap();
///
/// assert_eq!(a.base().value(), 0);
/// assert_eq!(b.base().value(), 8);
/// assert_eq!(allocator.remaining(), 52);
/// ```
#[derive(Debug, Clone)]
pub struct RegionAllocator<const N: usize> {
    capacity: u32,
    config: AllocatorConfig,
    regions: [Option<Region>; N],
    count: usize,
    next: ByteAddress,
}

impl<const N: usize> RegionAllocator<N> {
    /// Create an empty allocator for a store of `capacity` bytes.
    ///
    /// Capacities beyond `u32::MAX` are clamped; addresses are 32-bit.
    pub fn new(capacity: usize, config: AllocatorConfig) -> Self {
        let capacity = u32::try_from(capacity).unwrap_or(u32::MAX);
        Self {
            capacity,
            config,
            regions: [None; N],
            count: 0,
            next: config.base_offset(),
        }
    }

    /// Create an empty allocator sized to `store`.
    ///
    /// Only [`ByteStore::capacity`] is consulted; no I/O happens.
    pub fn for_store<S: ByteStore + ?Sized>(store: &S, config: AllocatorConfig) -> Self {
        Self::new(store.capacity(), config)
    }

    /// Reserve `size` bytes for `slot`.
    ///
    /// # Business Rules
    ///
    /// - Each slot can be registered once
    /// - The base is the end of the previous reservation rounded up to the
    ///   configured alignment (the base offset for the first one)
    /// - The whole range, padding included, must fit in the capacity
    ///
    /// A failed reservation leaves the table untouched.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSlot`, `TableFull` or `CapacityExceeded`.
    pub fn reserve(&mut self, slot: SlotId, size: u32) -> Result<Region, AllocError> {
        if self.region(slot).is_some() {
            return Err(AllocError::DuplicateSlot(slot));
        }

        if self.count == N {
            return Err(AllocError::TableFull { limit: N });
        }

        let available = self.remaining();
        let base = self.next.align_up(self.config.alignment());
        let requested = match base {
            Some(base) => base.offset_from(self.next).saturating_add(size),
            None => size,
        };

        let end = base.and_then(|base| base.value().checked_add(size));
        let (Some(base), Some(end)) = (base, end) else {
            warn!("reserve {} failed: aligned base overflows the address space", slot);
            return Err(AllocError::CapacityExceeded {
                slot,
                requested,
                available,
            });
        };

        if requested > available || end > self.capacity {
            warn!(
                "reserve {} failed: {} bytes requested, {} available",
                slot, requested, available
            );
            return Err(AllocError::CapacityExceeded {
                slot,
                requested,
                available,
            });
        }

        let region = Region::new(slot, base, size);
        self.regions[self.count] = Some(region);
        self.count += 1;
        self.next = region.end();

        trace!("reserved {}", region);
        Ok(region)
    }

    /// Look up a registered slot.
    pub fn region(&self, slot: SlotId) -> Option<Region> {
        self.regions().find(|r| r.slot() == slot)
    }

    /// Iterate over the registered regions in registration order.
    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.regions[..self.count].iter().flatten().copied()
    }

    /// Number of registered slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether no slot has been registered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bytes consumed so far, counted from address zero (base offset and
    /// alignment padding included).
    #[inline]
    pub const fn used(&self) -> u32 {
        self.next.value()
    }

    /// Bytes left after the last reservation.
    #[inline]
    pub const fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.next.value())
    }

    /// Store capacity the allocator was built for.
    #[inline]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The allocator configuration.
    #[inline]
    pub const fn config(&self) -> &AllocatorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_accumulates_in_order() {
        let mut allocator = RegionAllocator::<4>::new(64, AllocatorConfig::new(0));

        let a = allocator.reserve(SlotId::named("A"), 8).unwrap();
        let b = allocator.reserve(SlotId::named("B"), 4).unwrap();

        assert_eq!(a.base().value(), 0);
        assert_eq!(b.base().value(), 8);
        assert_eq!(allocator.used(), 12);
        assert_eq!(allocator.len(), 2);
    }

    #[test]
    fn test_reserve_respects_base_offset() {
        let mut allocator = RegionAllocator::<4>::new(64, AllocatorConfig::new(16));

        let a = allocator.reserve(SlotId::named("A"), 8).unwrap();
        let b = allocator.reserve(SlotId::named("B"), 4).unwrap();

        assert_eq!(a.base().value(), 16);
        assert_eq!(b.base().value(), 24);
        assert_eq!(allocator.remaining(), 64 - 28);
    }

    #[test]
    fn test_reserve_is_deterministic() {
        let layout = |alloc: &mut RegionAllocator<4>| {
            [
                alloc.reserve(SlotId::named("A"), 8).unwrap(),
                alloc.reserve(SlotId::index(7), 3).unwrap(),
                alloc.reserve(SlotId::named("C"), 5).unwrap(),
            ]
        };

        let config = AllocatorConfig::new(2).with_alignment(4).unwrap();
        let first = layout(&mut RegionAllocator::new(128, config));
        let second = layout(&mut RegionAllocator::new(128, config));
        assert_eq!(first, second);
    }

    #[test]
    fn test_reserve_alignment() {
        let config = AllocatorConfig::new(1).with_alignment(4).unwrap();
        let mut allocator = RegionAllocator::<4>::new(64, config);

        let a = allocator.reserve(SlotId::named("A"), 6).unwrap();
        let b = allocator.reserve(SlotId::named("B"), 2).unwrap();

        assert_eq!(a.base().value(), 4);
        assert_eq!(b.base().value(), 12);
    }

    #[test]
    fn test_regions_never_overlap() {
        let config = AllocatorConfig::new(3).with_alignment(2).unwrap();
        let mut allocator = RegionAllocator::<8>::new(256, config);
        for (i, size) in [1u32, 7, 0, 16, 3, 9].into_iter().enumerate() {
            allocator.reserve(SlotId::index(i as u16), size).unwrap();
        }

        let regions: std::vec::Vec<Region> = allocator.regions().collect();
        for (i, a) in regions.iter().enumerate() {
            assert!(a.end().value() <= 256);
            for b in &regions[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut allocator = RegionAllocator::<4>::new(16, AllocatorConfig::new(0));
        allocator.reserve(SlotId::named("A"), 12).unwrap();

        let err = allocator.reserve(SlotId::named("B"), 8).unwrap_err();
        assert_eq!(
            err,
            AllocError::CapacityExceeded {
                slot: SlotId::named("B"),
                requested: 8,
                available: 4,
            }
        );

        // Failed reservation leaves the table as it was
        assert_eq!(allocator.len(), 1);
        assert_eq!(allocator.reserve(SlotId::named("B"), 4).unwrap().base().value(), 12);
    }

    #[test]
    fn test_capacity_exceeded_by_padding() {
        let config = AllocatorConfig::new(0).with_alignment(8).unwrap();
        let mut allocator = RegionAllocator::<4>::new(16, config);
        allocator.reserve(SlotId::named("A"), 9).unwrap();

        // 7 bytes padding + 1 byte would reach 17
        assert!(matches!(
            allocator.reserve(SlotId::named("B"), 1),
            Err(AllocError::CapacityExceeded { requested: 8, available: 7, .. })
        ));
    }

    #[test]
    fn test_alignment_overflow_at_top_of_address_space() {
        let config = AllocatorConfig::new(0xFFFF_FFE0).with_alignment(16).unwrap();
        let mut allocator = RegionAllocator::<4>::new(usize::MAX, config);
        let a = allocator.reserve(SlotId::named("A"), 20).unwrap();
        assert_eq!(a.base().value(), 0xFFFF_FFE0);

        // the next aligned base would be past u32::MAX
        assert!(matches!(
            allocator.reserve(SlotId::named("B"), 1),
            Err(AllocError::CapacityExceeded { requested: 1, .. })
        ));
        assert_eq!(allocator.len(), 1);
        assert_eq!(allocator.used(), 0xFFFF_FFF4);
    }

    #[test]
    fn test_base_offset_beyond_capacity() {
        let mut allocator = RegionAllocator::<4>::new(8, AllocatorConfig::new(10));
        assert!(matches!(
            allocator.reserve(SlotId::named("A"), 1),
            Err(AllocError::CapacityExceeded { available: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_slot() {
        let mut allocator = RegionAllocator::<4>::new(64, AllocatorConfig::new(0));
        allocator.reserve(SlotId::named("cfg"), 8).unwrap();

        assert_eq!(
            allocator.reserve(SlotId::named("cfg"), 8),
            Err(AllocError::DuplicateSlot(SlotId::named("cfg")))
        );
    }

    #[test]
    fn test_table_full() {
        let mut allocator = RegionAllocator::<2>::new(64, AllocatorConfig::new(0));
        allocator.reserve(SlotId::index(0), 1).unwrap();
        allocator.reserve(SlotId::index(1), 1).unwrap();

        assert_eq!(
            allocator.reserve(SlotId::index(2), 1),
            Err(AllocError::TableFull { limit: 2 })
        );
    }

    #[test]
    fn test_region_lookup() {
        let mut allocator = RegionAllocator::<4>::new(64, AllocatorConfig::new(0));
        allocator.reserve(SlotId::named("A"), 8).unwrap();
        let b = allocator.reserve(SlotId::named("B"), 4).unwrap();

        assert_eq!(allocator.region(SlotId::named("B")), Some(b));
        assert_eq!(allocator.region(SlotId::named("C")), None);
    }
}
