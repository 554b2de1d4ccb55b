//! In-memory recording storage.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use pagestats_core::storage::{
    ObjectLocation, ObjectStorage, PutOptions, StorageError, StorageResult,
};

/// An object held by [`MockStorage`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Where the object lives.
    pub location: ObjectLocation,
    /// Object body.
    pub body: Bytes,
    /// Options of the last write, default for seeded objects.
    pub options: PutOptions,
}

impl StoredObject {
    /// Decodes the body as JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

/// In-memory [`ObjectStorage`] for tests.
///
/// Listing returns keys in insertion order, which lets tests model a backend
/// whose order is not lexical.
#[derive(Debug, Default)]
pub struct MockStorage {
    objects: Mutex<Vec<StoredObject>>,
    writes: Mutex<Vec<StoredObject>>,
    fail_reads: AtomicBool,
    fail_lists: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object without recording it as a write.
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) -> &Self {
        let object = StoredObject {
            location: ObjectLocation::new(bucket, key),
            body: body.into(),
            options: PutOptions::default(),
        };
        self.store(object);
        self
    }

    /// Makes every read fail.
    pub fn fail_reads(&self) -> &Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    /// Makes every listing fail.
    pub fn fail_lists(&self) -> &Self {
        self.fail_lists.store(true, Ordering::SeqCst);
        self
    }

    /// Makes every write fail.
    pub fn fail_writes(&self) -> &Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Returns the object at the given location.
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let location = ObjectLocation::new(bucket, key);
        self.lock_objects()
            .iter()
            .find(|object| object.location == location)
            .cloned()
    }

    /// Returns all successful writes in order.
    pub fn writes(&self) -> Vec<StoredObject> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, Vec<StoredObject>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn store(&self, object: StoredObject) {
        let mut objects = self.lock_objects();
        match objects.iter_mut().find(|o| o.location == object.location) {
            Some(existing) => *existing = object,
            None => objects.push(object),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockStorage {
    async fn get_object(&self, location: &ObjectLocation) -> StorageResult<Bytes> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::permission_denied(location.to_string()));
        }

        self.lock_objects()
            .iter()
            .find(|object| &object.location == location)
            .map(|object| object.body.clone())
            .ok_or_else(|| StorageError::not_found(location.to_string()))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(StorageError::list(format!("s3://{bucket}/{prefix}")));
        }

        Ok(self
            .lock_objects()
            .iter()
            .filter(|object| object.location.bucket == bucket)
            .filter(|object| object.location.key.starts_with(prefix))
            .map(|object| object.location.key.clone())
            .collect())
    }

    async fn put_object(
        &self,
        location: &ObjectLocation,
        body: Bytes,
        options: &PutOptions,
    ) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::write(location.to_string()));
        }

        let object = StoredObject {
            location: location.clone(),
            body,
            options: options.clone(),
        };

        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(object.clone());
        self.store(object);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pagestats_core::storage::StorageClass;

    use super::*;

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let storage = MockStorage::new();
        storage
            .insert("b", "ocr/stats/wf/p__z.json", "{}")
            .insert("b", "ocr/stats/wf/p__a.json", "{}")
            .insert("other", "ocr/stats/wf/p__m.json", "{}");

        let keys = storage.list_objects("b", "ocr/stats/wf/p").await.unwrap();
        assert_eq!(keys, vec!["ocr/stats/wf/p__z.json", "ocr/stats/wf/p__a.json"]);
    }

    #[tokio::test]
    async fn records_writes_with_options() {
        let storage = MockStorage::new();
        let location = ObjectLocation::new("b", "ocr/stats/wf/p__a.json");
        let options = PutOptions::new()
            .with_content_type("application/json")
            .with_storage_class(StorageClass::GlacierIr);

        storage
            .put_object(&location, Bytes::from(r#"{"n":1}"#), &options)
            .await
            .unwrap();

        let writes = storage.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].options, options);
        assert_eq!(writes[0].json().unwrap()["n"], 1);
        assert_eq!(storage.get_object(&location).await.unwrap(), writes[0].body);
    }

    #[tokio::test]
    async fn injected_failures() {
        let storage = MockStorage::new();
        storage.insert("b", "k", "v").fail_reads().fail_lists().fail_writes();

        let location = ObjectLocation::new("b", "k");
        assert!(storage.get_object(&location).await.is_err());
        assert!(storage.list_objects("b", "").await.is_err());
        assert!(
            storage
                .put_object(&location, Bytes::new(), &PutOptions::new())
                .await
                .is_err()
        );
        assert!(storage.writes().is_empty());
    }
}
