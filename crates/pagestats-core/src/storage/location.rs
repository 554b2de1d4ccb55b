//! Bucket and key of a stored artifact.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Location of a stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, Display)]
#[display("s3://{bucket}/{key}")]
pub struct ObjectLocation {
    /// Bucket name.
    pub bucket: String,
    /// Object key within the bucket.
    pub key: String,
}

impl ObjectLocation {
    /// Creates a new location.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Returns a location in the same bucket with a different key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self::new(self.bucket.clone(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_uri() {
        let location = ObjectLocation::new("covenants-deed-images", "ocr/json/a.json");
        assert_eq!(location.to_string(), "s3://covenants-deed-images/ocr/json/a.json");
        assert_eq!(
            location.with_key("ocr/stats/a__b.json").key,
            "ocr/stats/a__b.json"
        );
    }
}
