//! Statistics update handler.
//!
//! Sequences one invocation: event → stats key resolution → OCR fetch →
//! classification and aggregation → key parsing → record write. Every step
//! runs to completion before the next starts and the record is written
//! last, so a failure leaves storage untouched.

mod response;

use bytes::Bytes;
use pagestats_core::key::{ArtifactKind, KeyParts, derive_json_key};
use pagestats_core::ocr::{DocumentStats, OcrDocument, Statistics};
use pagestats_core::storage::{ObjectLocation, PutOptions};
pub use response::{HandlerResponse, ResponseBody, STATUS_OK, SUCCESS_MESSAGE};

use crate::event::TriggerEvent;
use crate::resolver::resolve_stats_key;
use crate::service::WorkerState;
use crate::{Result, WorkerError};

/// Tracing target for the statistics handler.
const TRACING_TARGET: &str = "pagestats_worker::handler";

/// Content type of written statistics records.
pub const STATS_CONTENT_TYPE: &str = "application/json";

/// Computes and stores the statistics of the page a hit event refers to.
#[derive(Debug, Clone)]
pub struct StatsHandler {
    state: WorkerState,
}

impl StatsHandler {
    /// Creates a new handler.
    pub fn new(state: WorkerState) -> Self {
        Self { state }
    }

    /// Returns the worker state.
    pub fn state(&self) -> &WorkerState {
        &self.state
    }

    /// Handles a raw JSON event.
    ///
    /// # Errors
    ///
    /// Fails with [`WorkerError::UnrecognizedEventShape`] for unknown
    /// events, and with the errors of [`handle_location`] otherwise.
    ///
    /// [`handle_location`]: Self::handle_location
    pub async fn handle(&self, event: &serde_json::Value) -> Result<HandlerResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            event = %event,
            "Received event"
        );

        let location = TriggerEvent::from_value(event)
            .and_then(|event| {
                tracing::debug!(
                    target: TRACING_TARGET,
                    shape = event.shape(),
                    "Recognized event shape"
                );
                event.location()
            })
            .inspect_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Rejected event"
                );
            })?;

        self.handle_location(&location).await
    }

    /// Updates the statistics of the page whose hit object is `hit`.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::NotFound`] when no stats key exists for the page
    /// - [`WorkerError::SourceObjectFetch`] when the OCR json cannot be read
    /// - [`WorkerError::Decode`] when the OCR json is not valid
    /// - [`WorkerError::MalformedKey`] when the stats key cannot be parsed
    /// - [`WorkerError::Storage`] when listing or writing fails
    #[tracing::instrument(
        skip(self, hit),
        fields(bucket = %hit.bucket, hit_key = %hit.key),
        target = TRACING_TARGET,
        name = "update_stats"
    )]
    pub async fn handle_location(&self, hit: &ObjectLocation) -> Result<HandlerResponse> {
        match self.update_stats(hit).await {
            Ok(response) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    stats_key = %response.body.stats,
                    uuid = %response.body.uuid,
                    handwriting_pct = response.body.handwriting_pct,
                    "Page stats saved"
                );
                Ok(response)
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %err,
                    kind = err.kind(),
                    "Page stats update failed"
                );
                Err(err)
            }
        }
    }

    async fn update_stats(&self, hit: &ObjectLocation) -> Result<HandlerResponse> {
        let storage = self.state.storage.as_ref();

        if ArtifactKind::of(&hit.key) != Some(ArtifactKind::Hits) {
            tracing::warn!(
                target: TRACING_TARGET,
                hit_key = %hit.key,
                "Key is outside the hits namespace, derived keys keep it unchanged"
            );
        }

        let stats_key = resolve_stats_key(storage, &hit.bucket, &hit.key).await?;

        let source = hit.with_key(derive_json_key(&hit.key));
        let document = self.fetch_document(&source).await?;

        let statistics = Statistics::from_document(&document);
        let parts = KeyParts::parse(&stats_key)?;
        let record = DocumentStats::new(&parts, &statistics);

        tracing::info!(
            target: TRACING_TARGET,
            workflow = %record.workflow,
            remainder = %record.remainder,
            public_uuid = %record.public_uuid,
            num_lines = record.num_lines,
            num_chars = record.num_chars,
            handwriting_pct = record.handwriting_pct,
            "Computed page stats"
        );

        let output = hit.with_key(parts.stats_key());
        let body = record.to_vec().map_err(WorkerError::Serialize)?;
        let options = PutOptions::new()
            .with_content_type(STATS_CONTENT_TYPE)
            .with_storage_class(self.state.config.stats_storage_class);

        storage
            .put_object(&output, Bytes::from(body), &options)
            .await?;

        Ok(HandlerResponse::ok(ResponseBody {
            message: SUCCESS_MESSAGE.to_owned(),
            bucket: hit.bucket.clone(),
            hit_key: hit.key.clone(),
            stats: output.key,
            uuid: record.public_uuid,
            handwriting_pct: record.handwriting_pct,
        }))
    }

    async fn fetch_document(&self, source: &ObjectLocation) -> Result<OcrDocument> {
        tracing::debug!(
            target: TRACING_TARGET,
            location = %source,
            "Fetching OCR document"
        );

        let data = self
            .state
            .storage
            .get_object(source)
            .await
            .map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET,
                    bucket = %source.bucket,
                    key = %source.key,
                    error = %err,
                    "Error getting OCR document, make sure it exists and the bucket is reachable"
                );
                WorkerError::SourceObjectFetch {
                    location: source.clone(),
                    source: err,
                }
            })?;

        OcrDocument::from_slice(&data).map_err(|err| WorkerError::Decode {
            location: source.clone(),
            source: err,
        })
    }
}
