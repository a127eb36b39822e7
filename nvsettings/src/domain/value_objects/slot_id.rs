//! Logical slot identifiers.

use core::fmt;

/// Caller-chosen identifier of a slot.
///
/// Firmware can name its slots (`"cfg"`, `"calib"`) or number them. The
/// identifier only matters inside the allocator's table; it is never stored
/// on the device.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// A named slot.
    Name(&'static str),
    /// A numbered slot.
    Index(u16),
}

impl SlotId {
    /// Create a named slot identifier.
    #[inline]
    pub const fn named(name: &'static str) -> Self {
        Self::Name(name)
    }

    /// Create a numbered slot identifier.
    #[inline]
    pub const fn index(index: u16) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "Slot({})", name),
            Self::Index(index) => write!(f, "Slot(#{})", index),
        }
    }
}

impl From<&'static str> for SlotId {
    fn from(name: &'static str) -> Self {
        Self::Name(name)
    }
}

impl From<u16> for SlotId {
    fn from(index: u16) -> Self {
        Self::Index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_id_equality() {
        assert_eq!(SlotId::from("cfg"), SlotId::named("cfg"));
        assert_ne!(SlotId::from("cfg"), SlotId::from("calib"));
        assert_ne!(SlotId::from(1u16), SlotId::from("1"));
    }

    #[test]
    fn test_slot_id_display() {
        assert_eq!(format!("{}", SlotId::named("cfg")), "Slot(cfg)");
        assert_eq!(format!("{}", SlotId::index(3)), "Slot(#3)");
    }
}
