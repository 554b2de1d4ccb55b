//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── storage: StorageConfig   # Backend, region, endpoint, credentials
//! ├── worker: WorkerConfig     # Storage class of written records
//! ├── event, pretty            # Input and output
//! └── log_format: LogFormat    # Text or JSON logs
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pagestats_opendal::StorageConfig;
use pagestats_worker::WorkerConfig;
use serde::{Deserialize, Serialize};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "pagestats")]
#[command(about = "Computes and stores OCR page statistics for a hit event")]
#[command(version)]
pub struct Cli {
    /// Path of the JSON trigger event; read from stdin when omitted.
    #[arg(long, value_name = "PATH")]
    pub event: Option<PathBuf>,

    /// Pretty-print the response.
    #[arg(long)]
    #[serde(default)]
    pub pretty: bool,

    /// Format of log lines written to stderr.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    #[serde(default)]
    pub log_format: LogFormat,

    /// Storage backend configuration.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Worker configuration.
    #[clap(flatten)]
    pub worker: WorkerConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so clap's `env` lookups see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.storage
            .validate()
            .context("invalid storage configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            backend = self.storage.backend_name(),
            region = ?self.storage.region,
            endpoint = ?self.storage.endpoint,
            credentials = self.storage.access_key_id.is_some(),
            "Storage configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            stats_storage_class = %self.worker.stats_storage_class,
            event = ?self.event,
            "Worker configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "s3").then_some("s3"),
            cfg!(feature = "dotenv").then_some("dotenv"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
