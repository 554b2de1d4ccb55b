#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod input;
mod telemetry;

use std::process;

use anyhow::Context;
use pagestats_opendal::StorageBackend;
use pagestats_worker::{HandlerResponse, StatsHandler, WorkerState};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "pagestats_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "pagestats_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "pagestats_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    let message = format!("{error:#}");
    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %message,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {message}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.log_format)?;
    cli.log();
    cli.validate()?;

    let event = input::read_event(cli.event.as_deref()).await?;

    let backend = StorageBackend::new(cli.storage.clone())
        .context("failed to create storage backend")?;
    let state = WorkerState::new(backend).with_config(cli.worker.clone());
    let handler = StatsHandler::new(state);

    let response = handler
        .handle(&event)
        .await
        .context("failed to update page stats")?;

    print_response(&response, cli.pretty)
}

/// Writes the response to stdout.
fn print_response(response: &HandlerResponse, pretty: bool) -> anyhow::Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    }
    .context("failed to serialize response")?;

    println!("{output}");
    Ok(())
}
