//! Write accounting for wear monitoring.

/// Counters kept by a manager across saves.
///
/// `skipped` is the number of writes the unchanged-record check saved the
/// memory from.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveStats {
    /// Saves that reached the store.
    pub writes: u32,
    /// Saves suppressed because nothing changed.
    pub skipped: u32,
    /// Saves whose store write failed.
    pub failed: u32,
}

impl SaveStats {
    /// Total number of save calls that got as far as encoding.
    #[inline]
    pub const fn total(&self) -> u32 {
        self.writes
            .saturating_add(self.skipped)
            .saturating_add(self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_stats_total() {
        let stats = SaveStats { writes: 2, skipped: 5, failed: 1 };
        assert_eq!(stats.total(), 8);
        assert_eq!(SaveStats::default().total(), 0);
    }
}
