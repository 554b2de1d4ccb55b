#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for statistics computation.
pub const TRACING_TARGET_OCR: &str = "pagestats_core::ocr";

/// Tracing target for key parsing and derivation.
pub const TRACING_TARGET_KEY: &str = "pagestats_core::key";

mod error;

pub mod key;
pub mod ocr;
pub mod storage;

#[doc(hidden)]
pub mod prelude;

pub use error::BoxedError;
