//! OCR page builder.

use bytes::Bytes;
use pagestats_core::ocr::{Block, OcrDocument, TextType};

/// Builds OCR pages block by block.
#[derive(Debug, Clone, Default)]
pub struct PageBuilder {
    blocks: Vec<Block>,
}

impl PageBuilder {
    /// Creates a builder holding a single page block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::page()],
        }
    }

    /// Adds a line block.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::line(text));
        self
    }

    /// Adds a printed word block.
    pub fn printed(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::word(text, TextType::Printed));
        self
    }

    /// Adds a handwritten word block.
    pub fn handwritten(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::word(text, TextType::Handwriting));
        self
    }

    /// Adds an arbitrary block.
    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Returns the built document.
    pub fn build(self) -> OcrDocument {
        OcrDocument::new(self.blocks)
    }

    /// Returns the built document as JSON bytes.
    pub fn to_bytes(self) -> Bytes {
        // Serializing plain owned strings and enums cannot fail.
        Bytes::from(serde_json::to_vec(&self.build()).unwrap_or_default())
    }
}
