//! Structured decomposition of stats keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ArtifactKind;
use super::error::{KeyError, KeyErrorKind, Result};

/// Extension of stats records written by this crate.
const STATS_EXTENSION: &str = "json";

/// Semantic fields of a key following
/// `{status}/{workflow}/{remainder}__{public_uuid}.{extension}`.
///
/// Parsing proceeds in fixed steps instead of a single pattern:
///
/// 1. the first two `/`-separated segments form the status, the third the
///    workflow, everything after is the tail;
/// 2. the tail is split on its last `.` into stem and extension;
/// 3. the stem is split on its last `__` into remainder and public id.
///
/// Because the split in step 3 takes the *last* `__`, a remainder that
/// itself ends in `__{alphanumeric}` before the extension cannot be told
/// apart from the public id. Upstream naming must avoid that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyParts {
    /// Two lowercase segments, e.g. `ocr/stats`.
    pub status: String,
    /// Letters and hyphens, e.g. `wi-milwaukee-county`.
    pub workflow: String,
    /// Path-like middle part, may contain `/`.
    pub remainder: String,
    /// Alphanumeric identifier shared by all artifacts of a page.
    pub public_uuid: String,
    /// Lowercase extension without the dot.
    pub extension: String,
}

impl KeyParts {
    /// Parses a key into its semantic fields.
    pub fn parse(key: &str) -> Result<Self> {
        let malformed = |kind| KeyError::new(key, kind);

        let mut segments = key.splitn(4, '/');
        let (Some(scope), Some(state), Some(workflow), Some(tail)) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(malformed(KeyErrorKind::MissingSegment));
        };

        if !is_lowercase_word(scope) || !is_lowercase_word(state) {
            return Err(malformed(KeyErrorKind::InvalidStatus));
        }

        if workflow.is_empty()
            || !workflow
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c == '-')
        {
            return Err(malformed(KeyErrorKind::InvalidWorkflow));
        }

        let (stem, extension) = tail
            .rsplit_once('.')
            .ok_or_else(|| malformed(KeyErrorKind::MissingExtension))?;

        if !is_lowercase_word(extension) {
            return Err(malformed(KeyErrorKind::InvalidExtension));
        }

        let (remainder, public_uuid) = stem
            .rsplit_once("__")
            .ok_or_else(|| malformed(KeyErrorKind::MissingPublicId))?;

        if public_uuid.is_empty() || !public_uuid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(malformed(KeyErrorKind::InvalidPublicId));
        }

        if remainder.is_empty() {
            return Err(malformed(KeyErrorKind::EmptyRemainder));
        }

        tracing::trace!(
            target: crate::TRACING_TARGET_KEY,
            key = %key,
            workflow = %workflow,
            public_uuid = %public_uuid,
            "Parsed key"
        );

        Ok(Self {
            status: format!("{scope}/{state}"),
            workflow: workflow.to_owned(),
            remainder: remainder.to_owned(),
            public_uuid: public_uuid.to_owned(),
            extension: extension.to_owned(),
        })
    }

    /// Reassembles the key these parts were parsed from.
    pub fn to_key(&self) -> String {
        self.to_string()
    }

    /// Returns the key the statistics record of this page is written to:
    /// `ocr/stats/{workflow}/{remainder}__{public_uuid}.json`.
    pub fn stats_key(&self) -> String {
        format!(
            "{}/{}/{}__{}.{}",
            ArtifactKind::Stats.namespace(),
            self.workflow,
            self.remainder,
            self.public_uuid,
            STATS_EXTENSION
        )
    }
}

impl fmt::Display for KeyParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}__{}.{}",
            self.status, self.workflow, self.remainder, self.public_uuid, self.extension
        )
    }
}

impl FromStr for KeyParts {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn is_lowercase_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase())
}
