//! Host-side tools for EEPROM settings images.
//!
//! The `nvsettings` binary works on image files that stand in for a
//! device's EEPROM, using the same record format and slot layout as the
//! firmware.

pub mod address_parser;
pub mod cli;
pub mod image;
pub mod user_settings;
