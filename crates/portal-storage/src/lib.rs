//! Portal Storage Library
//!
//! Persistence for per-booking document records. Each booking owns one
//! partition holding its records in upload order.
//!
//! # Partition keys
//!
//! The booking id is the partition key. Keys must be non-empty and must not
//! contain `..`, path separators or control characters. Validation lives in
//! the `keys` module so all backends agree on what a valid key is.

pub mod factory;
pub(crate) mod keys;
pub mod json_file;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_record_store;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use portal_core::{RecordStoreBackend, StoreError};
pub use traits::{RecordStore, StoreResult};
