//! Adapter layer - concrete byte stores behind the domain's port.
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - SettingsManager (service)     │
//!     │  - ByteStore (port)              │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - RamStore                      │
//!     │  - StorageAdapter                │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ uses
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │  EEPROM / flash driver           │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Available Adapters
//!
//! - **`RamStore`**: in-memory store, erased to `0xFF`, for tests and host simulation
//! - **`StorageAdapter`**: any `embedded_storage::Storage`, including
//!   `RmwNorFlashStorage` over NOR flash (requires `embedded-storage`)

mod ram_store;

#[cfg(feature = "embedded-storage")]
mod storage_adapter;

pub use ram_store::{ERASED_BYTE, RamStore, RamStoreError};

#[cfg(feature = "embedded-storage")]
pub use storage_adapter::{StorageAdapter, StorageAdapterError};
