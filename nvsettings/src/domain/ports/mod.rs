//! Ports define the interfaces between the domain and the outside world.
//!
//! The domain needs exactly one thing from the infrastructure: raw,
//! byte-addressable non-volatile memory. That is the [`ByteStore`] port.

mod byte_store;

pub use byte_store::ByteStore;
