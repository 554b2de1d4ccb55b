//! Prelude module for convenient imports.

pub use crate::key::{ArtifactKind, KeyError, KeyParts, derive_json_key, stats_prefix};
pub use crate::ocr::{Block, BlockType, DocumentStats, OcrDocument, Statistics, TextType};
pub use crate::storage::{
    BoxedStorage, ObjectLocation, ObjectStorage, PutOptions, StorageClass, StorageError,
    StorageResult,
};
