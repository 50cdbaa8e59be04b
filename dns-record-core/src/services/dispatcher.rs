//! 记录操作分发
//!
//! Turns a validated request into exactly one store mutation. Deletes query
//! first so that a missing record is reported instead of silently ignored.
//! In dry-run mode everything up to the mutating call runs, including the
//! existence query.

use std::fmt;
use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use dns_record_provider::{ARecordSpec, PtrRecordSpec, RecordFilter, RecordKind, StoreError};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{RecordAction, ValidatedRequest};
use crate::utils::dns_names::{domain_suffix, ptr_owner_name};

/// A fully parameterised store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateA(ARecordSpec),
    DeleteA { owner: String },
    CreatePtr(PtrRecordSpec),
    DeletePtr { owner: String, target: String },
}

impl Mutation {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::CreateA(_) | Self::DeleteA { .. } => RecordKind::A,
            Self::CreatePtr(_) | Self::DeletePtr { .. } => RecordKind::Ptr,
        }
    }

    /// Filter selecting the records a delete removes.
    fn delete_filter(&self) -> Option<RecordFilter> {
        match self {
            Self::DeleteA { owner } => Some(RecordFilter::owned_by(RecordKind::A, owner)),
            Self::DeletePtr { owner, target } => {
                Some(RecordFilter::owned_by(RecordKind::Ptr, owner).with_data(target))
            }
            Self::CreateA(_) | Self::CreatePtr(_) => None,
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateA(spec) => write!(
                f,
                "create A record {} -> {} in zone {}",
                spec.owner, spec.address, spec.zone
            ),
            Self::DeleteA { owner } => write!(f, "delete A records of {owner}"),
            Self::CreatePtr(spec) => write!(
                f,
                "create PTR record {} -> {} in zone {}",
                spec.owner, spec.target, spec.zone
            ),
            Self::DeletePtr { owner, target } => {
                write!(f, "delete PTR records of {owner} -> {target}")
            }
        }
    }
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The mutation that was (or, in dry-run mode, would have been) applied.
    pub mutation: Mutation,
    /// Records matched by a delete; `None` for creates.
    pub matched: Option<u32>,
    /// `false` in dry-run mode.
    pub applied: bool,
}

/// 记录操作分发器
pub struct ActionDispatcher {
    ctx: Arc<ServiceContext>,
}

impl ActionDispatcher {
    /// 创建分发器实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Dispatch `request` to `server`.
    ///
    /// Every store call is bounded by the configured timeout and aborted when
    /// `cancel` fires.
    pub async fn dispatch(
        &self,
        request: &ValidatedRequest,
        server: &str,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> CoreResult<DispatchOutcome> {
        let mutation = self.plan(request)?;
        log::debug!(
            "[{}] {server}: {mutation} (requested by {}: {})",
            self.ctx.store.id(),
            request.request_owner,
            request.note
        );

        let matched = match mutation.delete_filter() {
            Some(filter) => Some(self.count_existing(server, &filter, cancel).await?),
            None => None,
        };

        if dry_run {
            log::info!("Dry run, skipped: {mutation}");
            return Ok(DispatchOutcome {
                mutation,
                matched,
                applied: false,
            });
        }

        self.apply(server, &mutation, cancel).await?;
        Ok(DispatchOutcome {
            mutation,
            matched,
            applied: true,
        })
    }

    /// Check preconditions and build the mutation parameters.
    pub fn plan(&self, request: &ValidatedRequest) -> CoreResult<Mutation> {
        let hostname = request.hostname.trim();
        match (request.action, request.kind) {
            (RecordAction::Add, RecordKind::A) => {
                let address = parse_ipv4(&request.ip_address)?;
                let zone = self
                    .zone_for_a_record(request)
                    .ok_or(CoreError::ZoneNotSpecified)?;
                Ok(Mutation::CreateA(ARecordSpec {
                    zone,
                    owner: hostname.to_lowercase(),
                    address,
                }))
            }
            (RecordAction::Delete, RecordKind::A) => Ok(Mutation::DeleteA {
                owner: hostname.to_string(),
            }),
            (RecordAction::Add, RecordKind::Ptr) => {
                let address = parse_ipv4(&request.ip_address)?;
                let zone = request.zone.clone().ok_or(CoreError::ZoneNotSpecified)?;
                Ok(Mutation::CreatePtr(PtrRecordSpec {
                    zone,
                    owner: ptr_owner_name(&address.to_string()),
                    target: hostname.to_string(),
                }))
            }
            (RecordAction::Delete, RecordKind::Ptr) => {
                let address = parse_ipv4(&request.ip_address)?;
                Ok(Mutation::DeletePtr {
                    owner: ptr_owner_name(&address.to_string()),
                    target: hostname.to_string(),
                })
            }
        }
    }

    /// Zone for an A record: request, then joined domain, then the hostname's suffix.
    fn zone_for_a_record(&self, request: &ValidatedRequest) -> Option<String> {
        request
            .zone
            .clone()
            .or_else(|| self.ctx.joined_domain.clone())
            .or_else(|| {
                let suffix = domain_suffix(&request.hostname);
                (!suffix.is_empty()).then(|| suffix.to_string())
            })
    }

    async fn count_existing(
        &self,
        server: &str,
        filter: &RecordFilter,
        cancel: &CancellationToken,
    ) -> CoreResult<u32> {
        let store = &self.ctx.store;
        let records = self
            .call(server, cancel, store.query_records(server, filter))
            .await?;
        if records.is_empty() {
            return Err(CoreError::RecordNotFound(filter.kind));
        }
        Ok(u32::try_from(records.len()).unwrap_or(u32::MAX))
    }

    async fn apply(
        &self,
        server: &str,
        mutation: &Mutation,
        cancel: &CancellationToken,
    ) -> CoreResult<()> {
        let store = &self.ctx.store;
        let deleted = match mutation {
            Mutation::CreateA(spec) => {
                return self
                    .call(server, cancel, store.create_a_record(server, spec))
                    .await;
            }
            Mutation::CreatePtr(spec) => {
                return self
                    .call(server, cancel, store.create_ptr_record(server, spec))
                    .await;
            }
            Mutation::DeleteA { owner } => {
                self.call(server, cancel, store.delete_a_record(server, owner))
                    .await?
            }
            Mutation::DeletePtr { owner, target } => {
                self.call(server, cancel, store.delete_ptr_record(server, owner, target))
                    .await?
            }
        };

        // 查询与删除之间记录可能已被移除
        if deleted == 0 {
            return Err(CoreError::RecordNotFound(mutation.kind()));
        }
        Ok(())
    }

    /// Run one store call under the timeout and the cancellation token.
    async fn call<T, F>(&self, server: &str, cancel: &CancellationToken, op: F) -> CoreResult<T>
    where
        F: Future<Output = dns_record_provider::Result<T>>,
    {
        let timeout = self.ctx.store_timeout;
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                log::warn!("[{server}] Store call cancelled");
                Err(CoreError::Cancelled)
            }
            result = tokio::time::timeout(timeout, op) => match result {
                Ok(result) => result.map_err(CoreError::from),
                Err(_) => Err(StoreError::Timeout {
                    server: server.to_string(),
                    detail: format!("no response within {}s", timeout.as_secs()),
                }
                .into()),
            },
        }
    }
}

fn parse_ipv4(value: &str) -> CoreResult<Ipv4Addr> {
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidIpAddress(value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::HandlerConfig;
    use crate::test_utils::{RecordingStore, StoreCall, a_record, ptr_record, test_context};
    use crate::traits::InMemoryProgressSink;

    fn validated(action: RecordAction, kind: RecordKind, zone: Option<&str>) -> ValidatedRequest {
        ValidatedRequest {
            action,
            kind,
            hostname: "Web01.corp.example.com".to_string(),
            ip_address: "10.2.0.9".to_string(),
            zone: zone.map(str::to_string),
            request_owner: "jdoe".to_string(),
            note: "test".to_string(),
        }
    }

    fn dispatcher(store: &Arc<RecordingStore>) -> ActionDispatcher {
        ActionDispatcher::new(test_context(store.clone()))
    }

    #[tokio::test]
    async fn add_a_lowercases_owner_and_derives_zone() {
        let store = Arc::new(RecordingStore::new());
        let outcome = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Add, RecordKind::A, None),
                "dns01",
                false,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(outcome.applied);
        assert_eq!(outcome.matched, None);
        let calls = store.calls().await;
        assert_eq!(
            calls,
            vec![StoreCall::CreateA {
                server: "dns01".to_string(),
                spec: ARecordSpec {
                    zone: "corp.example.com".to_string(),
                    owner: "web01.corp.example.com".to_string(),
                    address: Ipv4Addr::new(10, 2, 0, 9),
                },
            }]
        );
    }

    #[tokio::test]
    async fn add_a_prefers_request_zone_then_joined_domain() {
        let store = Arc::new(RecordingStore::new());
        let ctx = ServiceContext::new(
            &HandlerConfig {
                joined_domain: Some("example.com".to_string()),
                ..HandlerConfig::default()
            },
            store,
            Arc::new(InMemoryProgressSink::new()),
        );
        let dispatcher = ActionDispatcher::new(Arc::new(ctx));

        let mutation = dispatcher
            .plan(&validated(RecordAction::Add, RecordKind::A, None))
            .unwrap();
        assert!(matches!(mutation, Mutation::CreateA(ref spec) if spec.zone == "example.com"));

        let mutation = dispatcher
            .plan(&validated(RecordAction::Add, RecordKind::A, Some("corp.example.com")))
            .unwrap();
        assert!(matches!(mutation, Mutation::CreateA(ref spec) if spec.zone == "corp.example.com"));
    }

    #[tokio::test]
    async fn add_a_without_any_zone_fails() {
        let store = Arc::new(RecordingStore::new());
        let mut request = validated(RecordAction::Add, RecordKind::A, None);
        request.hostname = "web01".to_string();
        let result = dispatcher(&store).plan(&request);
        assert!(matches!(result, Err(CoreError::ZoneNotSpecified)));
        assert_eq!(
            CoreError::ZoneNotSpecified.to_string(),
            "DNS zone is not specified."
        );
    }

    #[tokio::test]
    async fn add_ptr_requires_zone() {
        let store = Arc::new(RecordingStore::new());
        let result = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Add, RecordKind::Ptr, None),
                ".",
                false,
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(CoreError::ZoneNotSpecified)));
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn add_ptr_builds_reverse_owner() {
        let store = Arc::new(RecordingStore::new());
        dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Add, RecordKind::Ptr, Some("0.2.10.in-addr.arpa")),
                ".",
                false,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(
            store.calls().await,
            vec![StoreCall::CreatePtr {
                server: ".".to_string(),
                spec: PtrRecordSpec {
                    zone: "0.2.10.in-addr.arpa".to_string(),
                    owner: "9.0.2.10.in-addr.arpa".to_string(),
                    target: "Web01.corp.example.com".to_string(),
                },
            }]
        );
    }

    #[tokio::test]
    async fn invalid_address_is_rejected_before_store() {
        let store = Arc::new(RecordingStore::new());
        let mut request = validated(RecordAction::Delete, RecordKind::Ptr, None);
        request.ip_address = "10.2.0".to_string();
        let result = dispatcher(&store)
            .dispatch(&request, ".", false, &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(CoreError::InvalidIpAddress(ref ip)) if ip == "10.2.0"));
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn delete_a_without_match_is_not_found() {
        let store = Arc::new(RecordingStore::new());
        let result = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Delete, RecordKind::A, None),
                ".",
                false,
                &CancellationToken::new(),
            )
            .await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "DNS A record is not found.");
        assert_eq!(store.mutation_calls().await, 0);
    }

    #[tokio::test]
    async fn delete_a_removes_matching_records_only() {
        let store = Arc::new(RecordingStore::with_records(vec![
            a_record("web01.corp.example.com", "10.2.0.9"),
            ptr_record("9.0.2.10.in-addr.arpa", "web01.corp.example.com."),
        ]));
        let outcome = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Delete, RecordKind::A, None),
                ".",
                false,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, Some(1));
        assert!(outcome.applied);
        let remaining = store.records().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind, RecordKind::Ptr);
    }

    #[tokio::test]
    async fn delete_ptr_matches_target() {
        let store = Arc::new(RecordingStore::with_records(vec![ptr_record(
            "9.0.2.10.in-addr.arpa",
            "other.corp.example.com.",
        )]));
        let result = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Delete, RecordKind::Ptr, None),
                ".",
                false,
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "DNS PTR record is not found."
        );
    }

    #[tokio::test]
    async fn dry_run_queries_but_does_not_mutate() {
        let store = Arc::new(RecordingStore::with_records(vec![a_record(
            "web01.corp.example.com",
            "10.2.0.9",
        )]));
        let outcome = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Delete, RecordKind::A, None),
                ".",
                true,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(!outcome.applied);
        assert_eq!(outcome.matched, Some(1));
        assert_eq!(store.mutation_calls().await, 0);
        assert_eq!(store.calls().await.len(), 1);
        assert_eq!(store.records().await.len(), 1);
    }

    #[tokio::test]
    async fn store_error_is_preserved() {
        let store = Arc::new(RecordingStore::new());
        store
            .fail_with(StoreError::ConnectionFailed {
                server: "dns99".to_string(),
                detail: "The RPC server is unavailable.".to_string(),
            })
            .await;
        let err = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Add, RecordKind::A, None),
                "dns99",
                false,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::ConnectionFailed { .. })));
        assert!(err.to_string().contains("The RPC server is unavailable."));
    }

    #[tokio::test]
    async fn cancelled_token_aborts_store_call() {
        let store = Arc::new(RecordingStore::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Add, RecordKind::A, None),
                "dns01",
                false,
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
        assert_eq!(err.to_string(), "operation was cancelled");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_times_out() {
        let store = Arc::new(RecordingStore::new().with_delay(Duration::from_secs(120)));
        let err = dispatcher(&store)
            .dispatch(
                &validated(RecordAction::Add, RecordKind::A, None),
                "dns01",
                false,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::Timeout { .. })));
    }
}
