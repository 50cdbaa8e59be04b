//! DNS record handler entry point

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use dns_record_provider::{RecordStore, create_store};

use crate::config::HandlerConfig;
use crate::services::{BatchProcessor, ServiceContext};
use crate::traits::{LogProgressSink, ProgressSink};
use crate::types::{BatchRequest, BatchResponse};

/// Handler bound to one configuration and one record store.
///
/// Holds no per-run state; independent batches may run concurrently.
pub struct DnsRecordHandler {
    processor: BatchProcessor,
}

impl DnsRecordHandler {
    /// Handler reporting progress to the log.
    #[must_use]
    pub fn new(config: &HandlerConfig, store: Arc<dyn RecordStore>) -> Self {
        Self::with_progress_sink(config, store, Arc::new(LogProgressSink))
    }

    /// Handler reporting progress to `progress_sink`.
    #[must_use]
    pub fn with_progress_sink(
        config: &HandlerConfig,
        store: Arc<dyn RecordStore>,
        progress_sink: Arc<dyn ProgressSink>,
    ) -> Self {
        log::debug!(
            "DNS record handler using store '{}', default server '{}', {} route(s)",
            store.id(),
            config.dns_server,
            config.routes.len()
        );
        let ctx = Arc::new(ServiceContext::new(config, store, progress_sink));
        Self {
            processor: BatchProcessor::new(ctx),
        }
    }

    /// Handler over the store selected by the configuration.
    #[must_use]
    pub fn from_config(config: &HandlerConfig) -> Self {
        let store = create_store(config.store.clone());
        Self::new(config, store)
    }

    /// Process a batch.
    pub async fn process(
        &self,
        batch: &BatchRequest,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> BatchResponse {
        self.processor.process(batch, dry_run, cancel).await
    }

    /// Process a raw JSON payload.
    pub async fn process_json(
        &self,
        payload: &str,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> BatchResponse {
        self.processor.process_json(payload, dry_run, cancel).await
    }
}
