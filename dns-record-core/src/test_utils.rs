//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dns_record_provider::{
    ARecordSpec, PtrRecordSpec, RecordFilter, RecordKind, RecordStore, StoreError, StoredRecord,
};

use crate::config::HandlerConfig;
use crate::services::ServiceContext;
use crate::traits::{InMemoryProgressSink, ProgressSink};

// ===== RecordingStore =====

/// One call received by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    CreateA { server: String, spec: ARecordSpec },
    DeleteA { server: String, owner: String },
    CreatePtr { server: String, spec: PtrRecordSpec },
    DeletePtr { server: String, owner: String, target: String },
    Query { server: String, filter: RecordFilter },
}

impl StoreCall {
    fn is_mutation(&self) -> bool {
        !matches!(self, Self::Query { .. })
    }
}

/// Mock store that records every call and answers from a flat record list.
pub struct RecordingStore {
    calls: RwLock<Vec<StoreCall>>,
    records: RwLock<Vec<StoredRecord>>,
    /// 如果 Some，每次调用都返回此错误
    failure: RwLock<Option<StoreError>>,
    /// 每次调用前等待的时间（用于测试超时路径）
    delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<StoredRecord>) -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            records: RwLock::new(records),
            failure: RwLock::new(None),
            delay: None,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn fail_with(&self, error: StoreError) {
        *self.failure.write().await = Some(error);
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().await.clone()
    }

    pub async fn mutation_calls(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.is_mutation())
            .count()
    }

    pub async fn records(&self) -> Vec<StoredRecord> {
        self.records.read().await.clone()
    }

    async fn record(&self, call: StoreCall) -> dns_record_provider::Result<()> {
        self.calls.write().await.push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn remove(&self, filter: &RecordFilter) -> u32 {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !filter.matches(r));
        u32::try_from(before - records.len()).unwrap_or(u32::MAX)
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    fn id(&self) -> &'static str {
        "recording"
    }

    async fn create_a_record(
        &self,
        server: &str,
        spec: &ARecordSpec,
    ) -> dns_record_provider::Result<()> {
        self.record(StoreCall::CreateA {
            server: server.to_string(),
            spec: spec.clone(),
        })
        .await?;
        self.records.write().await.push(StoredRecord {
            kind: RecordKind::A,
            zone: spec.zone.clone(),
            owner: spec.owner.clone(),
            data: spec.address.to_string(),
        });
        Ok(())
    }

    async fn delete_a_record(&self, server: &str, owner: &str) -> dns_record_provider::Result<u32> {
        self.record(StoreCall::DeleteA {
            server: server.to_string(),
            owner: owner.to_string(),
        })
        .await?;
        Ok(self
            .remove(&RecordFilter::owned_by(RecordKind::A, owner))
            .await)
    }

    async fn create_ptr_record(
        &self,
        server: &str,
        spec: &PtrRecordSpec,
    ) -> dns_record_provider::Result<()> {
        self.record(StoreCall::CreatePtr {
            server: server.to_string(),
            spec: spec.clone(),
        })
        .await?;
        self.records.write().await.push(StoredRecord {
            kind: RecordKind::Ptr,
            zone: spec.zone.clone(),
            owner: spec.owner.clone(),
            data: format!("{}.", spec.target.trim_end_matches('.')),
        });
        Ok(())
    }

    async fn delete_ptr_record(
        &self,
        server: &str,
        owner: &str,
        target: &str,
    ) -> dns_record_provider::Result<u32> {
        self.record(StoreCall::DeletePtr {
            server: server.to_string(),
            owner: owner.to_string(),
            target: target.to_string(),
        })
        .await?;
        Ok(self
            .remove(&RecordFilter::owned_by(RecordKind::Ptr, owner).with_data(target))
            .await)
    }

    async fn query_records(
        &self,
        server: &str,
        filter: &RecordFilter,
    ) -> dns_record_provider::Result<Vec<StoredRecord>> {
        self.record(StoreCall::Query {
            server: server.to_string(),
            filter: filter.clone(),
        })
        .await?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

// ===== 工厂方法 =====

pub fn a_record(owner: &str, address: &str) -> StoredRecord {
    StoredRecord {
        kind: RecordKind::A,
        zone: "corp.example.com".to_string(),
        owner: owner.to_string(),
        data: address.to_string(),
    }
}

pub fn ptr_record(owner: &str, target: &str) -> StoredRecord {
    StoredRecord {
        kind: RecordKind::Ptr,
        zone: "0.2.10.in-addr.arpa".to_string(),
        owner: owner.to_string(),
        data: target.to_string(),
    }
}

/// Context over `store` with the default configuration.
pub fn test_context(store: Arc<RecordingStore>) -> Arc<ServiceContext> {
    test_context_with_sink(store, Arc::new(InMemoryProgressSink::new()))
}

pub fn test_context_with_sink(
    store: Arc<RecordingStore>,
    sink: Arc<dyn ProgressSink>,
) -> Arc<ServiceContext> {
    Arc::new(ServiceContext::new(&HandlerConfig::default(), store, sink))
}
