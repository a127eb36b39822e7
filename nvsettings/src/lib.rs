//! Versioned, checksummed settings objects on EEPROM.
//!
//! Each settings object is a fixed-size plain-data value that lives in RAM
//! while the firmware runs and in a fixed slot of byte-addressable
//! non-volatile memory between boots. Records carry a magic tag, a schema
//! version and a CRC-32, so blank memory, torn writes and stale layouts are
//! detected at load time and replaced by the caller's defaults.
//!
//! # Architecture
//!
//! ## Domain Layer (`domain`)
//! Storage-agnostic logic:
//! - **Value Objects**: `ByteAddress`, `SlotId`, `SchemaVersion`, `Region`, `AllocatorConfig`
//! - **Entities**: `ObjectState`, `LoadOutcome`, `SaveOutcome`, `SaveStats`
//! - **Services**: `RegionAllocator` (slot layout), the record codec, `SettingsManager`
//! - **Ports**: `ByteStore`
//!
//! ## Adapter Layer (`adapters`)
//! - **`RamStore`**: in-memory store for tests and host simulation
//! - **`StorageAdapter`**: any `embedded_storage::Storage` (feature `embedded-storage`)
//!
//! # Quick Start
//!
//! ```
//! use nvsettings::adapters::RamStore;
//! use nvsettings::domain::{
//!     AllocatorConfig, EncodeError, LoadOutcome, Payload, PayloadReader, PayloadWriter,
//!     RegionAllocator, SchemaVersion, SettingsManager,
//! };
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Led {
//!     brightness: u16,
//!     mode: u8,
//! }
//!
//! impl Payload for Led {
//!     const SIZE: usize = 3;
//!
//!     fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
//!         let mut w = PayloadWriter::new(out);
//!         w.put(&self.brightness)?;
//!         w.put(&self.mode)
//!     }
//!
//!     fn decode(bytes: &[u8]) -> Option<Self> {
//!         let mut r = PayloadReader::new(bytes);
//!         Some(Led { brightness: r.get()?, mode: r.get()? })
//!     }
//! }
//!
//! let mut eeprom = RamStore::<64>::new();
//! let mut allocator = RegionAllocator::<4>::for_store(&eeprom, AllocatorConfig::default());
//! let defaults = Led { brightness: 128, mode: 0 };
//! let mut led = SettingsManager::<Led, 16>::register(
//!     &mut allocator,
//!     "led",
//!     SchemaVersion::new(1),
//!     defaults,
//! )
//! .unwrap();
//!
//! assert_eq!(led.load(&mut eeprom).unwrap(), LoadOutcome::DefaultedMissing);
//! led.update(|l| l.brightness = 200);
//! led.close(&mut eeprom).unwrap();
//! ```
//!
//! # Features
//!
//! - `log`: Enable logging through `log`
//! - `defmt`: Enable logging through `defmt`
//! - `embedded-storage`: `StorageAdapter` for `embedded_storage::Storage`
//! - `postcard`: `Postcard<T, N>` payloads for serde types
//! - `unsaved-drop-panic`: panic when a manager with unsaved changes is dropped

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

// must come first so the macros are visible everywhere
#[macro_use]
mod fmt;

pub mod adapters;
pub mod domain;

pub use domain::{
    AllocError, AllocatorConfig, ByteAddress, ByteStore, DecodeError, EncodeError, FixedStr,
    LoadOutcome, ObjectState, Payload, PayloadReader, PayloadWriter, Region, RegionAllocator,
    SaveOutcome, SaveStats, SchemaVersion, SettingsManager, SlotId, StoreError,
};

pub use adapters::{RamStore, RamStoreError};

#[cfg(feature = "embedded-storage")]
pub use adapters::{StorageAdapter, StorageAdapterError};

#[cfg(feature = "postcard")]
pub use domain::Postcard;
