//! Portal Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! formatting helpers shared by every portal component.

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod store_types;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PortalConfig;
pub use error::{ErrorMetadata, LogLevel, StoreError, TransferError};
pub use models::*;
pub use store_types::RecordStoreBackend;
