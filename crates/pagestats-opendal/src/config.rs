//! Storage configuration types.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use pagestats_core::storage::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Supported storage backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackendType {
    /// Process-local in-memory storage.
    #[default]
    Memory,
    /// Amazon S3 compatible storage.
    S3,
}

/// Storage backend configuration.
///
/// The bucket is not part of the configuration: it arrives with every
/// request and the backend creates one operator per bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StorageConfig {
    /// Storage backend to use.
    ///
    /// Command-line runs default to `s3`; the in-memory backend starts empty
    /// and is only useful for tests and dry runs.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-backend", env = "STORAGE_BACKEND", value_enum, default_value_t = BackendType::S3)
    )]
    #[serde(default)]
    pub backend_type: BackendType,

    /// AWS region of the buckets.
    #[cfg_attr(feature = "config", arg(long = "storage-region", env = "AWS_REGION"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom endpoint URL (for S3-compatible storage like MinIO, R2).
    #[cfg_attr(feature = "config", arg(long = "storage-endpoint", env = "S3_ENDPOINT"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Access key ID.
    #[cfg_attr(feature = "config", arg(long = "storage-access-key-id", env = "AWS_ACCESS_KEY_ID"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    /// Secret access key.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-secret-access-key", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub secret_access_key: Option<String>,
}

impl StorageConfig {
    /// Creates an in-memory storage configuration.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Creates an S3 storage configuration for the given region.
    pub fn s3(region: impl Into<String>) -> Self {
        Self {
            backend_type: BackendType::S3,
            region: Some(region.into()),
            ..Self::default()
        }
    }

    /// Sets the custom endpoint (for S3-compatible storage).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the access credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self.backend_type {
            BackendType::Memory => "memory",
            BackendType::S3 => "s3",
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StorageResult<()> {
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(StorageError::init(
                "access key id and secret access key must be provided together",
            ));
        }

        if let Some(ref endpoint) = self.endpoint
            && !endpoint.starts_with("http://")
            && !endpoint.starts_with("https://")
        {
            return Err(StorageError::init(format!(
                "storage endpoint '{endpoint}' must start with http:// or https://"
            )));
        }

        Ok(())
    }
}
