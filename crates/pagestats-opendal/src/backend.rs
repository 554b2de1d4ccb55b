//! Storage backend implementation.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use opendal::{ErrorKind, Operator, services};
use pagestats_core::storage::{
    ObjectLocation, ObjectStorage, PutOptions, StorageClass, StorageError, StorageResult,
};
use tokio::sync::RwLock;

use crate::TRACING_TARGET;
use crate::config::{BackendType, StorageConfig};
use crate::error::from_opendal;

/// Cache key of a lazily built operator.
type OperatorKey = (String, Option<StorageClass>);

/// Unified storage backend that wraps OpenDAL operators.
///
/// OpenDAL binds an operator to a single bucket and, for S3, to a single
/// default storage class. Operators are therefore created on first use for
/// every `(bucket, storage class)` pair and cached for the lifetime of the
/// backend.
#[derive(Clone)]
pub struct StorageBackend {
    config: StorageConfig,
    operators: Arc<RwLock<HashMap<OperatorKey, Operator>>>,
}

impl StorageBackend {
    /// Creates a new storage backend from configuration.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = config.backend_name(),
            region = ?config.region,
            endpoint = ?config.endpoint,
            "Storage backend initialized"
        );

        Ok(Self {
            config,
            operators: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Creates an in-memory storage backend.
    pub fn memory() -> Self {
        Self {
            config: StorageConfig::memory(),
            operators: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the operator for `bucket`, creating it on first use.
    async fn operator(
        &self,
        bucket: &str,
        storage_class: Option<StorageClass>,
    ) -> StorageResult<Operator> {
        // Memory has no notion of storage tiers: share one operator per
        // bucket so reads observe all writes.
        let storage_class = match self.config.backend_type {
            BackendType::Memory => None,
            BackendType::S3 => storage_class,
        };
        let cache_key = (bucket.to_owned(), storage_class);

        if let Some(operator) = self.operators.read().await.get(&cache_key) {
            return Ok(operator.clone());
        }

        let mut operators = self.operators.write().await;
        if let Some(operator) = operators.get(&cache_key) {
            return Ok(operator.clone());
        }

        let operator = Self::create_operator(&self.config, bucket, storage_class)?;

        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %bucket,
            storage_class = ?storage_class,
            "Created storage operator"
        );

        operators.insert(cache_key, operator.clone());
        Ok(operator)
    }

    /// Creates an OpenDAL operator based on configuration.
    #[allow(unused_variables)]
    fn create_operator(
        config: &StorageConfig,
        bucket: &str,
        storage_class: Option<StorageClass>,
    ) -> StorageResult<Operator> {
        match config.backend_type {
            BackendType::Memory => Operator::new(services::Memory::default())
                .map(|op| op.finish())
                .map_err(|e| StorageError::init(e.to_string())),

            #[cfg(feature = "s3")]
            BackendType::S3 => {
                let mut builder = services::S3::default().bucket(bucket);

                if let Some(ref region) = config.region {
                    builder = builder.region(region);
                }

                if let Some(ref endpoint) = config.endpoint {
                    builder = builder.endpoint(endpoint);
                }

                if let Some(ref access_key_id) = config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }

                if let Some(ref secret_access_key) = config.secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }

                if let Some(storage_class) = storage_class {
                    builder = builder.default_storage_class(storage_class.as_ref());
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            #[cfg(not(feature = "s3"))]
            BackendType::S3 => Err(StorageError::init(
                "backend type s3 is not supported with current features",
            )),
        }
    }
}

/// Returns the directory containing `prefix`, in OpenDAL path form.
fn parent_dir(prefix: &str) -> &str {
    match prefix.rfind('/') {
        Some(index) => &prefix[..=index],
        None => "/",
    }
}

#[async_trait::async_trait]
impl ObjectStorage for StorageBackend {
    async fn get_object(&self, location: &ObjectLocation) -> StorageResult<Bytes> {
        tracing::debug!(
            target: TRACING_TARGET,
            location = %location,
            "Reading object"
        );

        let operator = self.operator(&location.bucket, None).await?;
        let data = operator
            .read(&location.key)
            .await
            .map_err(from_opendal)?
            .to_bytes();

        tracing::debug!(
            target: TRACING_TARGET,
            location = %location,
            size = data.len(),
            "Object read complete"
        );

        Ok(data)
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>> {
        let operator = self.operator(bucket, None).await?;

        // OpenDAL lists directories. Backends that support `start_after`
        // return file keys in order, so the listing starts at the prefix and
        // stops at the first file past it. Directory entries may arrive out
        // of order and never end the listing.
        let sorted = operator.info().full_capability().list_with_start_after;
        let dir = parent_dir(prefix);
        let mut lister = operator.lister_with(dir);
        if sorted {
            lister = lister.start_after(prefix);
        }

        let mut lister = match lister.await {
            Ok(lister) => lister,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(from_opendal(err)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = lister.try_next().await.map_err(from_opendal)? {
            if !entry.metadata().mode().is_file() {
                continue;
            }

            let key = entry.path().trim_start_matches('/');
            if key.starts_with(prefix) {
                keys.push(key.to_owned());
            } else if sorted && key > prefix {
                break;
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %bucket,
            prefix = %prefix,
            count = keys.len(),
            sorted,
            "Listed objects"
        );

        Ok(keys)
    }

    async fn put_object(
        &self,
        location: &ObjectLocation,
        body: Bytes,
        options: &PutOptions,
    ) -> StorageResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            location = %location,
            size = body.len(),
            content_type = ?options.content_type,
            storage_class = ?options.storage_class,
            "Writing object"
        );

        let operator = self.operator(&location.bucket, options.storage_class).await?;

        let mut write = operator.write_with(&location.key, body);
        if let Some(ref content_type) = options.content_type {
            if operator.info().full_capability().write_with_content_type {
                write = write.content_type(content_type);
            } else {
                tracing::debug!(
                    target: TRACING_TARGET,
                    backend = self.config.backend_name(),
                    "Backend does not store content types, skipping"
                );
            }
        }
        write.await.map_err(from_opendal)?;

        tracing::debug!(
            target: TRACING_TARGET,
            location = %location,
            "Object write complete"
        );

        Ok(())
    }
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBackend")
            .field("backend_type", &self.config.backend_type)
            .field("region", &self.config.region)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(key: &str) -> ObjectLocation {
        ObjectLocation::new("covenants-deed-images", key)
    }

    #[test]
    fn parent_dir_of_prefix() {
        assert_eq!(parent_dir("ocr/stats/wf/17760704/page_0002"), "ocr/stats/wf/17760704/");
        assert_eq!(parent_dir("ocr/stats/"), "ocr/stats/");
        assert_eq!(parent_dir("page"), "/");
    }

    #[tokio::test]
    async fn put_and_get() {
        let backend = StorageBackend::memory();
        let options = PutOptions::new()
            .with_content_type("application/json")
            .with_storage_class(StorageClass::GlacierIr);

        backend
            .put_object(&location("ocr/json/a.json"), Bytes::from("{}"), &options)
            .await
            .unwrap();

        let data = backend.get_object(&location("ocr/json/a.json")).await.unwrap();
        assert_eq!(data, Bytes::from("{}"));
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let backend = StorageBackend::memory();
        let err = backend
            .get_object(&location("ocr/json/missing.json"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn lists_by_key_prefix() {
        let backend = StorageBackend::memory();
        let options = PutOptions::new();
        for key in [
            "ocr/stats/wf/17760704/page_0002__b2.json",
            "ocr/stats/wf/17760704/page_0002__a1.json",
            "ocr/stats/wf/17760704/page_0003__c3.json",
            "ocr/stats/wf/17760705/page_0002__d4.json",
            "ocr/stats/wf/17760704/page_0002_parts/inner.json",
        ] {
            backend
                .put_object(&location(key), Bytes::from("{}"), &options)
                .await
                .unwrap();
        }

        let mut keys = backend
            .list_objects("covenants-deed-images", "ocr/stats/wf/17760704/page_0002")
            .await
            .unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "ocr/stats/wf/17760704/page_0002__a1.json",
                "ocr/stats/wf/17760704/page_0002__b2.json",
            ]
        );

        let keys = backend
            .list_objects("covenants-deed-images", "ocr/stats/wf/17760706/page")
            .await
            .unwrap();
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn buckets_are_isolated() {
        let backend = StorageBackend::memory();
        backend
            .put_object(
                &ObjectLocation::new("bucket-a", "ocr/json/a.json"),
                Bytes::from("{}"),
                &PutOptions::new(),
            )
            .await
            .unwrap();

        let err = backend
            .get_object(&ObjectLocation::new("bucket-b", "ocr/json/a.json"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
