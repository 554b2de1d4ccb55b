//! Prelude module for convenient imports.

pub use crate::backend::StorageBackend;
pub use crate::config::{BackendType, StorageConfig};
