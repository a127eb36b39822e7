//! Lifecycle state of a managed settings object.

use super::LoadOutcome;

/// Where the RAM copy of a settings object came from.
///
/// Objects transition through these states:
/// - Uninitialized: nothing has been loaded yet, the RAM copy holds the defaults
/// - Loaded: the RAM copy was decoded (or migrated) from a valid stored record
/// - Defaulted: the stored record was missing or unusable, the RAM copy holds the defaults
///
/// Saving never changes the state. After a save following `Defaulted` the slot
/// holds valid data for the next boot, but this boot's copy still came from
/// the defaults.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectState {
    /// No load has happened yet.
    #[default]
    Uninitialized,
    /// RAM copy came from storage.
    Loaded,
    /// RAM copy came from the caller's defaults.
    Defaulted,
}

impl ObjectState {
    /// Check if the object has been loaded (successfully or not).
    #[inline]
    pub const fn is_initialized(&self) -> bool {
        !matches!(self, ObjectState::Uninitialized)
    }

    /// Check if the RAM copy came from storage.
    #[inline]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, ObjectState::Loaded)
    }

    /// Check if the RAM copy came from the defaults.
    #[inline]
    pub const fn is_defaulted(&self) -> bool {
        matches!(self, ObjectState::Defaulted)
    }
}

impl From<LoadOutcome> for ObjectState {
    fn from(outcome: LoadOutcome) -> Self {
        if outcome.is_from_storage() {
            ObjectState::Loaded
        } else {
            ObjectState::Defaulted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_state_checks() {
        let state = ObjectState::default();
        assert_eq!(state, ObjectState::Uninitialized);
        assert!(!state.is_initialized());

        assert!(ObjectState::Loaded.is_loaded());
        assert!(ObjectState::Loaded.is_initialized());
        assert!(ObjectState::Defaulted.is_defaulted());
        assert!(!ObjectState::Defaulted.is_loaded());
    }

    #[test]
    fn test_object_state_from_outcome() {
        assert_eq!(ObjectState::from(LoadOutcome::FromStorage), ObjectState::Loaded);
        assert_eq!(ObjectState::from(LoadOutcome::Migrated { from: 1 }), ObjectState::Loaded);
        assert_eq!(ObjectState::from(LoadOutcome::DefaultedMissing), ObjectState::Defaulted);
        assert_eq!(
            ObjectState::from(LoadOutcome::DefaultedVersionMismatch { stored: 1 }),
            ObjectState::Defaulted
        );
    }
}
