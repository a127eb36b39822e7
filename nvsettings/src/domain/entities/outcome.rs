//! Results of load and save operations.

use crate::domain::error::DecodeError;
use core::fmt;

/// How a load ended.
///
/// None of these are errors: corruption and schema drift are expected
/// conditions that degrade to the caller's defaults.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A valid record with the expected schema was decoded.
    FromStorage,
    /// A valid record with an older schema was converted by the caller's migration.
    Migrated {
        /// Schema version the record was stored under.
        from: u16,
    },
    /// No record (blank memory or foreign data).
    DefaultedMissing,
    /// The record failed its checksum (bit rot or a torn write).
    DefaultedChecksumFail,
    /// The record is intact but was written under another schema version.
    DefaultedVersionMismatch {
        /// Schema version the record was stored under.
        stored: u16,
    },
    /// The record is intact and carries the right version, but its payload
    /// does not fit the current payload type.
    DefaultedLayoutMismatch,
}

impl LoadOutcome {
    /// Check if the RAM copy now holds data from storage.
    #[inline]
    pub const fn is_from_storage(&self) -> bool {
        matches!(self, LoadOutcome::FromStorage | LoadOutcome::Migrated { .. })
    }

    /// Check if the RAM copy now holds the defaults.
    #[inline]
    pub const fn is_defaulted(&self) -> bool {
        !self.is_from_storage()
    }
}

impl From<DecodeError> for LoadOutcome {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::MissingMagic => LoadOutcome::DefaultedMissing,
            DecodeError::Truncated { .. } | DecodeError::ChecksumMismatch { .. } => {
                LoadOutcome::DefaultedChecksumFail
            }
            DecodeError::VersionMismatch { stored, .. } => {
                LoadOutcome::DefaultedVersionMismatch { stored }
            }
            DecodeError::LengthMismatch { .. } | DecodeError::InvalidPayload => {
                LoadOutcome::DefaultedLayoutMismatch
            }
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FromStorage => write!(f, "loaded from storage"),
            Self::Migrated { from } => write!(f, "migrated from schema v{}", from),
            Self::DefaultedMissing => write!(f, "defaults (no record present)"),
            Self::DefaultedChecksumFail => write!(f, "defaults (checksum failure)"),
            Self::DefaultedVersionMismatch { stored } => {
                write!(f, "defaults (stored schema v{} differs)", stored)
            }
            Self::DefaultedLayoutMismatch => write!(f, "defaults (payload layout mismatch)"),
        }
    }
}

/// How a save ended.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written to the store.
    Written,
    /// The encoded record matched the last write; nothing was written.
    Unchanged,
}

impl SaveOutcome {
    /// Check if the save reached the store.
    #[inline]
    pub const fn is_written(&self) -> bool {
        matches!(self, SaveOutcome::Written)
    }
}
