//! 进度通知类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence number of the last notification of a run; supersedes every other.
pub const FINAL_SEQUENCE: i32 = i32::MAX;

/// Batch execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatchStatus {
    #[default]
    None,
    Initializing,
    Running,
    Complete,
    Failed,
}

/// Progress notification sent to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub context: String,
    pub message: String,
    pub status: BatchStatus,
    pub sequence: i32,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(
        context: impl Into<String>,
        message: impl Into<String>,
        status: BatchStatus,
        sequence: i32,
    ) -> Self {
        Self {
            context: context.into(),
            message: message.into(),
            status,
            sequence,
            timestamp: Utc::now(),
        }
    }

    pub fn is_final(&self) -> bool {
        self.sequence == FINAL_SEQUENCE
    }
}
