#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;
mod error;

#[doc(hidden)]
pub mod prelude;

pub use backend::StorageBackend;
pub use config::{BackendType, StorageConfig};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "pagestats_opendal";
