use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::types::{ARecordSpec, PtrRecordSpec, RecordFilter, StoredRecord};

/// 原始错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawStoreError {
    /// 错误码（HRESULT / WBEM 状态码，如 `0x800706ba`）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawStoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 目标 DNS 服务器
    pub server: String,
    /// 区域（用于 `ZoneNotFound`）
    pub zone: Option<String>,
    /// 记录所有者名称（用于 `RecordExists`）
    pub owner: Option<String>,
}

impl ErrorContext {
    pub fn server(server: &str) -> Self {
        Self {
            server: server.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = Some(zone.to_string());
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }
}

/// 错误映射 Trait（内部使用）
/// 各 store 实现此 trait 以将原始错误映射到统一错误类型
pub(crate) trait StoreErrorMapper {
    /// 将原始错误映射到统一错误类型
    fn map_error(&self, raw: RawStoreError, context: ErrorContext) -> StoreError;

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawStoreError, context: &ErrorContext) -> StoreError {
        StoreError::Unknown {
            server: context.server.clone(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// DNS record store.
///
/// Every operation is addressed to one DNS server (`"."` is the local
/// server). Calls are remote and may be slow; implementations must not hold
/// locks across the remote call so independent invocations can run
/// concurrently.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store identifier, used in logs.
    fn id(&self) -> &'static str;

    /// Create an A record.
    async fn create_a_record(&self, server: &str, spec: &ARecordSpec) -> Result<()>;

    /// Delete every A record owned by `owner`.
    ///
    /// Returns the number of records deleted. Deleting the A record leaves the
    /// paired PTR record in place.
    async fn delete_a_record(&self, server: &str, owner: &str) -> Result<u32>;

    /// Create a PTR record.
    async fn create_ptr_record(&self, server: &str, spec: &PtrRecordSpec) -> Result<()>;

    /// Delete every PTR record owned by `owner` that points to `target`.
    ///
    /// Returns the number of records deleted.
    async fn delete_ptr_record(&self, server: &str, owner: &str, target: &str) -> Result<u32>;

    /// List the records matching `filter`.
    async fn query_records(&self, server: &str, filter: &RecordFilter)
    -> Result<Vec<StoredRecord>>;
}
