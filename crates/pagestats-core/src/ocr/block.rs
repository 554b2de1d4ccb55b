//! Textract-style block model and classification.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Structural kind of an OCR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// Page-level metadata block.
    Page,
    /// A detected line of text.
    Line,
    /// A single detected word.
    Word,
    /// Any other block kind (tables, cells, key-value sets, ...).
    #[serde(other)]
    Other,
}

/// How the text of a word block was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TextType {
    /// Handwritten text.
    Handwriting,
    /// Machine printed text.
    Printed,
    /// Any other text type.
    #[serde(other)]
    Other,
}

/// One structural element of an OCR result.
///
/// Only the fields consumed by the statistics are modelled; everything else
/// in the source JSON (geometry, relationships, confidence) is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Kind of this block.
    pub block_type: BlockType,
    /// Recognized text, present on line and word blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text type, present on word blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_type: Option<TextType>,
}

impl Block {
    /// Creates a page block.
    pub fn page() -> Self {
        Self {
            block_type: BlockType::Page,
            text: None,
            text_type: None,
        }
    }

    /// Creates a line block with the given text.
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            block_type: BlockType::Line,
            text: Some(text.into()),
            text_type: None,
        }
    }

    /// Creates a word block with the given text and text type.
    pub fn word(text: impl Into<String>, text_type: TextType) -> Self {
        Self {
            block_type: BlockType::Word,
            text: Some(text.into()),
            text_type: Some(text_type),
        }
    }

    /// Returns the text of this block, or an empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Returns `true` if this is a handwritten word block.
    pub fn is_handwriting(&self) -> bool {
        matches!(self.text_type, Some(TextType::Handwriting))
    }
}

/// A page-level OCR result as stored under the `ocr/json` namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Flat, unordered block list.
    #[serde(rename = "Blocks")]
    pub blocks: Vec<Block>,
}

impl OcrDocument {
    /// Creates a document from a block list.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Decodes a document from its JSON representation.
    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    /// Partitions the blocks of this document.
    pub fn classify(&self) -> ClassifiedBlocks<'_> {
        classify(&self.blocks)
    }
}

/// Blocks of a page grouped by their semantic role.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBlocks<'a> {
    /// Page metadata blocks.
    pub pages: Vec<&'a Block>,
    /// Line blocks.
    pub lines: Vec<&'a Block>,
    /// Word blocks.
    pub words: Vec<&'a Block>,
    /// Word blocks tagged as handwriting, a subset of `words`.
    pub handwritten_words: Vec<&'a Block>,
}

/// Partitions a flat block list into pages, lines, words and handwritten
/// words. Any group may be empty.
pub fn classify(blocks: &[Block]) -> ClassifiedBlocks<'_> {
    let mut classified = ClassifiedBlocks::default();

    for block in blocks {
        match block.block_type {
            BlockType::Page => classified.pages.push(block),
            BlockType::Line => classified.lines.push(block),
            BlockType::Word => {
                classified.words.push(block);
                if block.is_handwriting() {
                    classified.handwritten_words.push(block);
                }
            }
            BlockType::Other => {}
        }
    }

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_textract_blocks() {
        let json = br#"{
            "DocumentMetadata": {"Pages": 1},
            "Blocks": [
                {"BlockType": "PAGE", "Id": "p1", "Geometry": {}},
                {"BlockType": "LINE", "Text": "WARRANTY DEED", "Confidence": 99.1},
                {"BlockType": "WORD", "Text": "WARRANTY", "TextType": "PRINTED"},
                {"BlockType": "WORD", "Text": "Smith", "TextType": "HANDWRITING"},
                {"BlockType": "KEY_VALUE_SET", "EntityTypes": ["KEY"]}
            ]
        }"#;

        let document = OcrDocument::from_slice(json).unwrap();
        assert_eq!(document.blocks.len(), 5);
        assert_eq!(document.blocks[0].block_type, BlockType::Page);
        assert_eq!(document.blocks[1].text(), "WARRANTY DEED");
        assert!(document.blocks[3].is_handwriting());
        assert_eq!(document.blocks[4].block_type, BlockType::Other);
    }

    #[test]
    fn unknown_text_type_is_not_handwriting() {
        let block: Block =
            serde_json::from_str(r#"{"BlockType": "WORD", "Text": "x", "TextType": "STAMP"}"#)
                .unwrap();
        assert_eq!(block.text_type, Some(TextType::Other));
        assert!(!block.is_handwriting());
    }

    #[test]
    fn word_without_text_type_is_not_handwriting() {
        let block: Block = serde_json::from_str(r#"{"BlockType": "WORD", "Text": "x"}"#).unwrap();
        assert!(block.text_type.is_none());
        assert!(!block.is_handwriting());
    }

    #[test]
    fn classify_partitions_blocks() {
        let blocks = vec![
            Block::page(),
            Block::line("hello"),
            Block::line("world again"),
            Block::word("hello", TextType::Printed),
            Block::word("world", TextType::Handwriting),
            Block::word("again", TextType::Handwriting),
        ];

        let classified = classify(&blocks);
        assert_eq!(classified.pages.len(), 1);
        assert_eq!(classified.lines.len(), 2);
        assert_eq!(classified.words.len(), 3);
        assert_eq!(classified.handwritten_words.len(), 2);
        assert!(classified.handwritten_words.iter().all(|b| b.is_handwriting()));
    }

    #[test]
    fn classify_empty_document() {
        let document = OcrDocument::default();
        let classified = document.classify();
        assert!(classified.pages.is_empty());
        assert!(classified.lines.is_empty());
        assert!(classified.words.is_empty());
        assert!(classified.handwritten_words.is_empty());
    }

    #[test]
    fn missing_blocks_field_fails() {
        assert!(OcrDocument::from_slice(br#"{"DocumentMetadata": {}}"#).is_err());
    }
}
