//! Worker configuration.

#[cfg(feature = "config")]
use clap::Args;
use pagestats_core::storage::StorageClass;
use serde::{Deserialize, Serialize};

/// Default storage tier of written statistics records.
pub const DEFAULT_STATS_STORAGE_CLASS: StorageClass = StorageClass::GlacierIr;

/// Worker behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct WorkerConfig {
    /// Storage class of written statistics records.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "stats-storage-class",
            env = "STATS_STORAGE_CLASS",
            default_value_t = DEFAULT_STATS_STORAGE_CLASS
        )
    )]
    #[serde(default = "default_stats_storage_class")]
    pub stats_storage_class: StorageClass,
}

fn default_stats_storage_class() -> StorageClass {
    DEFAULT_STATS_STORAGE_CLASS
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            stats_storage_class: DEFAULT_STATS_STORAGE_CLASS,
        }
    }
}

impl WorkerConfig {
    /// Sets the storage class of written statistics records.
    pub fn with_stats_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.stats_storage_class = storage_class;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_archival_tier() {
        assert_eq!(
            WorkerConfig::default().stats_storage_class,
            StorageClass::GlacierIr
        );

        let config: WorkerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WorkerConfig::default());
    }
}
