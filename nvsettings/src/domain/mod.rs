//! Domain layer.
//!
//! Everything in here is storage-agnostic. The only way out to hardware is
//! the [`ByteStore`] port, which adapters implement.

pub mod allocator;
pub mod codec;
pub mod entities;
pub mod error;
pub mod manager;
pub mod payload;
pub mod ports;
pub mod value_objects;

pub use allocator::RegionAllocator;
pub use codec::{
    RECORD_MAGIC, RawRecord, RecordHeader, decode_record, encode_record, inspect_record,
    record_checksum, record_len,
};
pub use entities::{LoadOutcome, ObjectState, SaveOutcome, SaveStats};
pub use error::{AllocError, DecodeError, EncodeError, StoreError};
pub use manager::SettingsManager;
#[cfg(feature = "postcard")]
pub use payload::Postcard;
pub use payload::{FixedStr, Payload, PayloadReader, PayloadWriter};
pub use ports::ByteStore;
pub use value_objects::{
    AllocatorConfig, AllocatorConfigError, ByteAddress, Region, SchemaVersion, SlotId,
};
