//! Allocator configuration value object.

use super::ByteAddress;

/// Default first address handed out by the allocator.
pub const DEFAULT_BASE_OFFSET: u32 = 0;

/// Default base alignment (none).
pub const DEFAULT_ALIGNMENT: u32 = 1;

/// Configuration for region allocation.
///
/// - `base_offset`: addresses below this are left to the store's own
///   bookkeeping and never handed out
/// - `alignment`: every slot base is rounded up to a multiple of this
///   (a non-zero power of two; `1` packs slots back to back)
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    base_offset: u32,
    alignment: u32,
}

impl AllocatorConfig {
    /// Create a configuration starting at `base_offset` with no alignment.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvsettings::domain::AllocatorConfig;
    ///
    /// let config = AllocatorConfig::new(16);
    /// assert_eq!(config.base_offset().value(), 16);
    /// assert_eq!(config.alignment(), 1);
    /// ```
    pub const fn new(base_offset: u32) -> Self {
        Self {
            base_offset,
            alignment: DEFAULT_ALIGNMENT,
        }
    }

    /// Set the slot base alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if `alignment` is zero or not a power of two.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvsettings::domain::AllocatorConfig;
    ///
    /// let config = AllocatorConfig::new(0).with_alignment(4).unwrap();
    /// assert_eq!(config.alignment(), 4);
    /// assert!(AllocatorConfig::new(0).with_alignment(3).is_err());
    /// ```
    pub const fn with_alignment(self, alignment: u32) -> Result<Self, AllocatorConfigError> {
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(AllocatorConfigError::InvalidAlignment { alignment });
        }

        Ok(Self {
            base_offset: self.base_offset,
            alignment,
        })
    }

    /// First address the allocator may hand out.
    #[inline]
    pub const fn base_offset(&self) -> ByteAddress {
        ByteAddress::new(self.base_offset)
    }

    /// Slot base alignment in bytes.
    #[inline]
    pub const fn alignment(&self) -> u32 {
        self.alignment
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_OFFSET)
    }
}

/// Errors that can occur when creating an AllocatorConfig.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocatorConfigError {
    /// Alignment is zero or not a power of two.
    InvalidAlignment {
        /// The requested alignment.
        alignment: u32,
    },
}

impl core::fmt::Display for AllocatorConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidAlignment { alignment } => write!(
                f,
                "Alignment {} must be a non-zero power of two",
                alignment
            ),
        }
    }
}

impl core::error::Error for AllocatorConfigError {}
