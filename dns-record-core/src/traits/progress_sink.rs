//! Progress sink abstract Trait

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{BatchStatus, ProgressEvent};

/// Progress Sink Trait
///
/// Receives the progress notifications of a batch run. The host decides
/// where they go (orchestrator callback, log, test buffer).
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Deliver one notification
    ///
    /// # Arguments
    /// * `event` - Progress notification
    async fn notify(&self, event: ProgressEvent);
}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgressSink;

#[async_trait]
impl ProgressSink for LogProgressSink {
    async fn notify(&self, event: ProgressEvent) {
        match event.status {
            BatchStatus::Failed => log::warn!(
                "[{}] {:?} #{}: {}",
                event.context,
                event.status,
                event.sequence,
                event.message
            ),
            _ => log::info!(
                "[{}] {:?} #{}: {}",
                event.context,
                event.status,
                event.sequence,
                event.message
            ),
        }
    }
}

/// In-memory progress sink
///
/// Keeps every notification in arrival order.
#[derive(Clone, Default)]
pub struct InMemoryProgressSink {
    events: Arc<RwLock<Vec<ProgressEvent>>>,
}

impl InMemoryProgressSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far
    pub async fn events(&self) -> Vec<ProgressEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl ProgressSink for InMemoryProgressSink {
    async fn notify(&self, event: ProgressEvent) {
        self.events.write().await.push(event);
    }
}
