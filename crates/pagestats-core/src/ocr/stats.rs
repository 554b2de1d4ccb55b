//! Page statistics derived from classified OCR blocks.

use serde::{Deserialize, Serialize};

use super::block::{Block, ClassifiedBlocks, OcrDocument};
use crate::key::KeyParts;

/// Summary numbers of a single OCR page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of line blocks.
    pub num_lines: usize,
    /// Total number of characters over all line texts.
    pub num_chars: usize,
    /// Share of word blocks that are handwritten, rounded to two decimals.
    pub handwriting_pct: f64,
}

impl Statistics {
    /// Computes the statistics of already classified blocks.
    pub fn from_classified(classified: &ClassifiedBlocks<'_>) -> Self {
        aggregate(
            &classified.lines,
            &classified.words,
            &classified.handwritten_words,
        )
    }

    /// Classifies the blocks of a document and computes its statistics.
    pub fn from_document(document: &OcrDocument) -> Self {
        Self::from_classified(&document.classify())
    }
}

/// Computes line count, character count and handwriting ratio.
///
/// Characters are counted as Unicode scalar values, not bytes.
pub fn aggregate(lines: &[&Block], words: &[&Block], handwritten_words: &[&Block]) -> Statistics {
    let num_chars = lines.iter().map(|line| line.text().chars().count()).sum();

    Statistics {
        num_lines: lines.len(),
        num_chars,
        handwriting_pct: handwriting_ratio(handwritten_words.len(), words.len()),
    }
}

/// Returns `handwritten / total` rounded to two decimals, or `0.0` when
/// there are no words at all.
///
/// Rounding works on the exact binary value and breaks ties to even, so
/// `1/8` is `0.12` and `3/8` is `0.38`.
pub fn handwriting_ratio(handwritten: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let ratio = handwritten as f64 / total as f64;
    // Fixed precision formatting rounds the exact decimal expansion.
    format!("{ratio:.2}").parse().unwrap_or(ratio)
}

/// Statistics record persisted under the `ocr/stats` namespace.
///
/// Created once per invocation and never mutated after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Workflow the page belongs to.
    pub workflow: String,
    /// Path-like remainder between the workflow and the public identifier.
    pub remainder: String,
    /// Public identifier shared by all artifacts of the page.
    pub public_uuid: String,
    /// Number of line blocks.
    pub num_lines: usize,
    /// Total number of characters over all line texts.
    pub num_chars: usize,
    /// Share of handwritten words.
    pub handwriting_pct: f64,
}

impl DocumentStats {
    /// Builds the record from the parsed stats key and computed statistics.
    ///
    /// The public identifier is taken from the key; no new one is minted.
    pub fn new(parts: &KeyParts, statistics: &Statistics) -> Self {
        Self {
            workflow: parts.workflow.clone(),
            remainder: parts.remainder.clone(),
            public_uuid: parts.public_uuid.clone(),
            num_lines: statistics.num_lines,
            num_chars: statistics.num_chars,
            handwriting_pct: statistics.handwriting_pct,
        }
    }

    /// Returns the computed statistics part of this record.
    pub fn statistics(&self) -> Statistics {
        Statistics {
            num_lines: self.num_lines,
            num_chars: self.num_chars,
            handwriting_pct: self.handwriting_pct,
        }
    }

    /// Serializes the record to JSON bytes.
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
