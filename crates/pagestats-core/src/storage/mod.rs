//! Object storage abstraction.
//!
//! The statistics pipeline talks to storage only through [`ObjectStorage`],
//! so it can run against a real bucket or an in-memory fake alike.

use std::sync::Arc;

use bytes::Bytes;

mod error;
mod location;
mod options;

pub use error::{StorageError, StorageResult};
pub use location::ObjectLocation;
pub use options::{PutOptions, StorageClass};

/// Type alias for a shared, type-erased storage handle.
pub type BoxedStorage = Arc<dyn ObjectStorage>;

/// Minimal object store operations needed by the statistics pipeline.
///
/// Implementations perform exactly one backend call per method and never
/// retry; failures surface to the caller.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Reads the full body of an object.
    async fn get_object(&self, location: &ObjectLocation) -> StorageResult<Bytes>;

    /// Lists the full keys of all objects in `bucket` starting with `prefix`.
    ///
    /// The order is whatever the backend returns.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>>;

    /// Writes an object, replacing any previous object at the same location.
    async fn put_object(
        &self,
        location: &ObjectLocation,
        body: Bytes,
        options: &PutOptions,
    ) -> StorageResult<()>;
}
