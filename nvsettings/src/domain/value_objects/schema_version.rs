//! Payload schema version.

use core::fmt;

/// Identifies the layout of a payload.
///
/// Bump it whenever the payload's fields or size change. A record stored
/// under another version is reported as a version mismatch rather than
/// being reinterpreted with the wrong layout.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaVersion(u16);

impl SchemaVersion {
    /// Create a schema version.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the underlying u16 value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u16> for SchemaVersion {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl From<SchemaVersion> for u16 {
    fn from(version: SchemaVersion) -> Self {
        version.value()
    }
}
