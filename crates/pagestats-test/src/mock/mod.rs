//! Mock implementations for testing.
//!
//! This module provides an in-memory storage backend and builders for OCR
//! pages. They have no network access and are deterministic.

mod page;
mod storage;

pub use page::PageBuilder;
pub use storage::{MockStorage, StoredObject};
