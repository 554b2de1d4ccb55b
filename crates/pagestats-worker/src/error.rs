//! Worker error types.

use std::borrow::Cow;

use pagestats_core::key::KeyError;
use pagestats_core::storage::{ObjectLocation, StorageError};

/// Result type alias for worker operations.
pub type Result<T, E = WorkerError> = std::result::Result<T, E>;

/// Worker error type.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The event matched none of the supported shapes.
    #[error("unrecognized event shape: {reason}")]
    UnrecognizedEventShape { reason: Cow<'static, str> },

    /// No stats object shares the derived prefix.
    #[error("no stats object in bucket '{bucket}' with prefix '{prefix}'")]
    NotFound { bucket: String, prefix: String },

    /// The OCR document could not be fetched.
    #[error("failed to fetch source object {location}")]
    SourceObjectFetch {
        location: ObjectLocation,
        #[source]
        source: StorageError,
    },

    /// The resolved stats key does not follow the key grammar.
    #[error(transparent)]
    MalformedKey(#[from] KeyError),

    /// The fetched OCR document is not valid OCR json.
    #[error("failed to decode OCR document {location}")]
    Decode {
        location: ObjectLocation,
        #[source]
        source: serde_json::Error,
    },

    /// Listing or writing failed.
    #[error("storage operation failed: {0}")]
    Storage(#[from] StorageError),

    /// The statistics record could not be serialized.
    #[error("failed to serialize statistics: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl WorkerError {
    /// Creates an unrecognized event shape error.
    pub fn unrecognized_event(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::UnrecognizedEventShape {
            reason: reason.into(),
        }
    }

    /// Returns a short, stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnrecognizedEventShape { .. } => "unrecognized_event_shape",
            Self::NotFound { .. } => "not_found",
            Self::SourceObjectFetch { .. } => "source_object_fetch",
            Self::MalformedKey(_) => "malformed_key",
            Self::Decode { .. } => "decode",
            Self::Storage(_) => "storage",
            Self::Serialize(_) => "serialize",
        }
    }
}
