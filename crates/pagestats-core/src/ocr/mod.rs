//! OCR result model and page statistics.
//!
//! This module consumes an already produced Textract-style OCR result. It
//! never performs recognition itself: it partitions the flat block list of a
//! page and derives summary numbers from it.

mod block;
mod stats;

pub use block::{Block, BlockType, ClassifiedBlocks, OcrDocument, TextType, classify};
pub use stats::{DocumentStats, Statistics, aggregate, handwriting_ratio};
