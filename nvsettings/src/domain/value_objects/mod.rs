//! Value objects for the domain layer.
//!
//! Value objects are immutable, validated data types that represent
//! concepts in the domain model. They provide type safety and encapsulate
//! validation logic.

mod byte_address;
mod slot_id;
mod schema_version;
mod region;
mod allocator_config;

pub use byte_address::ByteAddress;
pub use slot_id::SlotId;
pub use schema_version::SchemaVersion;
pub use region::Region;
pub use allocator_config::{AllocatorConfig, AllocatorConfigError, DEFAULT_ALIGNMENT, DEFAULT_BASE_OFFSET};
