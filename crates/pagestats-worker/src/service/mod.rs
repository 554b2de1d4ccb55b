//! Worker state and configuration.

mod config;

use std::sync::Arc;

pub use config::{DEFAULT_STATS_STORAGE_CLASS, WorkerConfig};
use pagestats_core::storage::{BoxedStorage, ObjectStorage};

/// Application state for the statistics worker.
///
/// Holds the injected storage backend; nothing else is shared between
/// invocations.
#[derive(Clone)]
pub struct WorkerState {
    /// Storage backend for all reads, listings and writes.
    pub storage: BoxedStorage,
    /// Worker behavior settings.
    pub config: WorkerConfig,
}

impl WorkerState {
    /// Creates a new worker state with default settings.
    pub fn new(storage: impl ObjectStorage + 'static) -> Self {
        Self::from_shared(Arc::new(storage))
    }

    /// Creates a new worker state from an already shared storage handle.
    pub fn from_shared(storage: BoxedStorage) -> Self {
        Self {
            storage,
            config: WorkerConfig::default(),
        }
    }

    /// Sets the worker configuration.
    pub fn with_config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
