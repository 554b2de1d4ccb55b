//! Key grammar errors.

use strum::{AsRefStr, IntoStaticStr};

/// Result type for key parsing.
pub type Result<T, E = KeyError> = std::result::Result<T, E>;

/// Grammar rule a malformed key violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum KeyErrorKind {
    /// Fewer path segments than `{status}/{workflow}/{rest}`.
    MissingSegment,
    /// A status segment is empty or not lowercase ASCII letters.
    InvalidStatus,
    /// The workflow is empty or contains characters other than letters and hyphens.
    InvalidWorkflow,
    /// No `.` separating the extension.
    MissingExtension,
    /// The extension is empty or not lowercase ASCII letters.
    InvalidExtension,
    /// No `__` separating the public identifier.
    MissingPublicId,
    /// The public identifier is empty or not ASCII alphanumeric.
    InvalidPublicId,
    /// Nothing between the workflow and the public identifier.
    EmptyRemainder,
}

/// A key that does not follow
/// `{status}/{workflow}/{remainder}__{public_uuid}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed key '{key}': {}", .kind.as_ref())]
pub struct KeyError {
    key: String,
    kind: KeyErrorKind,
}

impl KeyError {
    /// Creates a new key error.
    pub fn new(key: impl Into<String>, kind: KeyErrorKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }

    /// Returns the offending key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the violated grammar rule.
    pub fn kind(&self) -> KeyErrorKind {
        self.kind
    }
}
