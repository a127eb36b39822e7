//! Domain entities for the settings manager.
//!
//! The managed object itself is caller-defined; what the domain tracks is its
//! lifecycle: where the RAM copy came from, how each load and save ended, and
//! how many writes the slot has cost.

mod object_state;
mod outcome;
mod save_stats;

pub use object_state::ObjectState;
pub use outcome::{LoadOutcome, SaveOutcome};
pub use save_stats::SaveStats;
