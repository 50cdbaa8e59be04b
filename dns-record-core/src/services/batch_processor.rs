//! 批量请求处理
//!
//! Items run one after another. Every failure is caught at the item boundary
//! and turned into a result with exit code -1, so one item never stops the
//! ones after it and the response always has one result per request.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::services::{ActionDispatcher, ServiceContext, validate};
use crate::types::{
    ActionResult, BatchRequest, BatchResponse, BatchStatus, EXIT_FAILURE, EXIT_SUCCESS,
    FINAL_SEQUENCE, PayloadItem, ProgressEvent,
};
use crate::utils::item_log::ItemLog;

/// Context name of the progress notifications of a run.
pub const EXECUTE_CONTEXT: &str = "Execute";

/// 批量请求处理器
pub struct BatchProcessor {
    ctx: Arc<ServiceContext>,
    dispatcher: ActionDispatcher,
}

/// Per-run progress state
struct RunProgress<'a> {
    ctx: &'a ServiceContext,
    run_id: Uuid,
    sequence: i32,
}

impl RunProgress<'_> {
    async fn notify(&mut self, status: BatchStatus, message: impl Into<String>) {
        self.sequence += 1;
        let event = ProgressEvent::new(EXECUTE_CONTEXT, message, status, self.sequence);
        self.ctx.progress_sink.notify(event).await;
    }

    async fn finish(&self, status: BatchStatus, summary: &str) {
        log::info!("Run {} finished with {status:?}: {summary}", self.run_id);
        let event = ProgressEvent::new(EXECUTE_CONTEXT, summary, status, FINAL_SEQUENCE);
        self.ctx.progress_sink.notify(event).await;
    }
}

impl BatchProcessor {
    /// 创建处理器实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(ctx.clone()),
            ctx,
        }
    }

    /// Process a raw JSON payload.
    ///
    /// Entries are read one by one, so a bad entry only fails its own result.
    /// A payload that is not JSON is treated like one without actions.
    pub async fn process_json(
        &self,
        payload: &str,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> BatchResponse {
        let mut progress = self.start_run();
        progress
            .notify(BatchStatus::Initializing, "Deserializing incoming request...")
            .await;

        let items = PayloadItem::read_all(payload).unwrap_or_else(|e| {
            log::warn!("Incoming request is not a valid DNS request: {e}");
            Vec::new()
        });
        self.run(&items, dry_run, cancel, progress).await
    }

    /// Process a batch.
    pub async fn process(
        &self,
        batch: &BatchRequest,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> BatchResponse {
        let items: Vec<PayloadItem> = batch
            .actions()
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(PayloadItem::from)
            .collect();
        let progress = self.start_run();
        self.run(&items, dry_run, cancel, progress).await
    }

    fn start_run(&self) -> RunProgress<'_> {
        let run_id = Uuid::new_v4();
        log::debug!("Starting run {run_id}");
        RunProgress {
            ctx: &self.ctx,
            run_id,
            sequence: 0,
        }
    }

    async fn run(
        &self,
        items: &[PayloadItem],
        dry_run: bool,
        cancel: &CancellationToken,
        mut progress: RunProgress<'_>,
    ) -> BatchResponse {
        if items.is_empty() {
            let error = CoreError::MalformedBatch;
            log::warn!("{error}");
            let summary = format!(
                "DNS request execution failed{}: {error}.",
                if dry_run { " in dry run mode" } else { "" }
            );
            progress.finish(BatchStatus::Failed, &summary).await;
            return BatchResponse::failed(summary);
        }

        let total = items.len();
        progress
            .notify(
                BatchStatus::Running,
                format!(
                    "Processing {total} DNS action(s){}...",
                    if dry_run { " in dry run mode" } else { "" }
                ),
            )
            .await;

        let mut results = Vec::with_capacity(total);
        for (index, item) in items.iter().enumerate() {
            let result = if cancel.is_cancelled() {
                let mut item_log = ItemLog::new();
                item_log.failure(&CoreError::Cancelled);
                ActionResult::from_request(&item.request, EXIT_FAILURE, item_log.into_note())
            } else {
                self.process_item(item, dry_run, cancel).await
            };

            progress
                .notify(
                    BatchStatus::Running,
                    format!(
                        "[{}/{total}] {}: {}",
                        index + 1,
                        if result.is_success() { "succeeded" } else { "failed" },
                        result.note.lines().next_back().unwrap_or_default()
                    ),
                )
                .await;
            results.push(result);
        }

        let mut response = BatchResponse {
            results,
            summary: String::new(),
            status: BatchStatus::Complete,
        };
        response.summary = summarize(&response, dry_run);
        progress.finish(response.status, &response.summary).await;
        response
    }

    /// Process one request; never fails, errors become exit code -1.
    async fn process_item(
        &self,
        item: &PayloadItem,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> ActionResult {
        let request = &item.request;
        let mut item_log = ItemLog::new();
        item_log.info("Verifying request parameters...");
        item_log.info(request.to_string());

        match self.execute_item(item, dry_run, cancel, &mut item_log).await {
            Ok(()) => ActionResult::from_request(request, EXIT_SUCCESS, item_log.into_note()),
            Err(e) => {
                item_log.failure(&e);
                ActionResult::from_request(request, EXIT_FAILURE, item_log.into_note())
            }
        }
    }

    async fn execute_item(
        &self,
        item: &PayloadItem,
        dry_run: bool,
        cancel: &CancellationToken,
        item_log: &mut ItemLog,
    ) -> CoreResult<()> {
        if let Some(reason) = &item.unreadable {
            return Err(CoreError::UnreadableRequest(reason.clone()));
        }
        let validated = validate(&item.request)?;
        let server = self.ctx.resolver.resolve(&validated.hostname)?;

        item_log.info(if dry_run {
            "Executing request in dry run mode..."
        } else {
            "Executing request..."
        });
        item_log.info(validated.progress_message());

        let outcome = self
            .dispatcher
            .dispatch(&validated, server, dry_run, cancel)
            .await?;
        if !outcome.applied {
            item_log.info(format!("Dry run, not applied: {}", outcome.mutation));
        }
        item_log.info("Operation is successful.");
        Ok(())
    }
}

fn summarize(response: &BatchResponse, dry_run: bool) -> String {
    format!(
        "DNS request execution is complete{}: {} of {} action(s) succeeded, {} failed.",
        if dry_run {
            " in dry run mode, no record was changed"
        } else {
            ""
        },
        response.succeeded_count(),
        response.results.len(),
        response.failed_count()
    )
}
