//! 批处理响应类型定义

use serde::{Deserialize, Serialize};

use super::{BatchStatus, RecordActionRequest};

/// Exit code of a successful item.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code of a failed item.
pub const EXIT_FAILURE: i32 = -1;

/// Outcome of one request, in input order.
///
/// `action`, `recordType`, `hostname` and `ipAddress` echo the request verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub action: Option<String>,
    pub record_type: Option<String>,
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
    /// 0 成功，-1 失败
    pub exit_code: i32,
    /// 本条请求的进度与错误信息，按行分隔
    pub note: String,
}

impl ActionResult {
    pub fn from_request(request: &RecordActionRequest, exit_code: i32, note: String) -> Self {
        Self {
            action: request.action.clone(),
            record_type: request.record_type.clone(),
            hostname: request.hostname.clone(),
            ip_address: request.ip_address.clone(),
            exit_code,
            note,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == EXIT_SUCCESS
    }
}

/// Response of one batch invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub results: Vec<ActionResult>,
    pub summary: String,
    pub status: BatchStatus,
}

impl BatchResponse {
    /// Batch-level failure: no item was processed.
    pub fn failed(summary: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            summary: summary.into(),
            status: BatchStatus::Failed,
        }
    }

    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.succeeded_count()
    }
}
