//! Write options.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// S3 storage tier of a written object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StorageClass {
    /// Frequently accessed data.
    #[default]
    Standard,
    /// Infrequently accessed data.
    StandardIa,
    /// Infrequently accessed data stored in a single zone.
    OnezoneIa,
    /// Automatic tiering.
    IntelligentTiering,
    /// Archive with millisecond retrieval.
    GlacierIr,
    /// Archive with minutes-to-hours retrieval.
    Glacier,
    /// Long-term archive.
    DeepArchive,
}

/// Options applied to a single object write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// MIME type stored with the object.
    pub content_type: Option<String>,
    /// Storage tier, or the backend default when `None`.
    pub storage_class: Option<StorageClass>,
}

impl PutOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the storage class.
    pub fn with_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.storage_class = Some(storage_class);
        self
    }
}
