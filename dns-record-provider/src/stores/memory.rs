//! In-memory record store
//!
//! Holds zones and records per server in process memory. Servers that were
//! not registered behave like unreachable hosts, and creating a record in a
//! zone the server does not host fails like it does on a real server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::stores::common::{normalize_domain_name, server_key, to_rooted_name};
use crate::traits::RecordStore;
use crate::types::{
    ARecordSpec, MemoryServerSeed, PtrRecordSpec, RecordFilter, RecordKind, StoredRecord,
};

/// Message reported for servers the store does not know about.
const UNREACHABLE_MESSAGE: &str = "The RPC server is unavailable.";

#[derive(Debug, Default)]
struct ServerData {
    /// zone (lower-cased) -> records
    zones: HashMap<String, Vec<StoredRecord>>,
}

impl ServerData {
    fn records(&self) -> impl Iterator<Item = &StoredRecord> {
        self.zones.values().flatten()
    }

    fn remove_matching(&mut self, filter: &RecordFilter) -> u32 {
        let mut removed = 0;
        for records in self.zones.values_mut() {
            let before = records.len();
            records.retain(|r| !filter.matches(r));
            removed += before - records.len();
        }
        u32::try_from(removed).unwrap_or(u32::MAX)
    }
}

/// In-memory record store
///
/// Default store for tests and local dry runs, available on all platforms.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    servers: RwLock<HashMap<String, ServerData>>,
    mutations: AtomicUsize,
}

impl InMemoryRecordStore {
    /// Create an empty store that knows no servers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from seed data.
    #[must_use]
    pub fn from_seeds(seeds: &[MemoryServerSeed]) -> Self {
        seeds.iter().fold(Self::new(), |store, seed| {
            let store = store.with_server(&seed.name);
            seed.zones
                .iter()
                .fold(store, |store, zone| store.with_zone(&seed.name, zone))
        })
    }

    /// Register a reachable server.
    #[must_use]
    pub fn with_server(mut self, server: &str) -> Self {
        self.servers
            .get_mut()
            .entry(server_key(server))
            .or_default();
        self
    }

    /// Register a zone on a server (the server is registered as well).
    #[must_use]
    pub fn with_zone(mut self, server: &str, zone: &str) -> Self {
        self.servers
            .get_mut()
            .entry(server_key(server))
            .or_default()
            .zones
            .entry(zone_key(zone))
            .or_default();
        self
    }

    /// Add a record directly, bypassing zone checks and mutation counting.
    #[must_use]
    pub fn with_record(mut self, server: &str, record: StoredRecord) -> Self {
        self.servers
            .get_mut()
            .entry(server_key(server))
            .or_default()
            .zones
            .entry(zone_key(&record.zone))
            .or_default()
            .push(record);
        self
    }

    /// Number of create/delete calls that changed the store.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Snapshot of every record held for `server`.
    pub async fn records(&self, server: &str) -> Vec<StoredRecord> {
        self.servers
            .read()
            .await
            .get(&server_key(server))
            .map(|data| data.records().cloned().collect())
            .unwrap_or_default()
    }

    fn unreachable(server: &str) -> StoreError {
        StoreError::ConnectionFailed {
            server: server.to_string(),
            detail: UNREACHABLE_MESSAGE.to_string(),
        }
    }

    async fn insert(&self, server: &str, record: StoredRecord) -> Result<()> {
        let mut servers = self.servers.write().await;
        let data = servers
            .get_mut(&server_key(server))
            .ok_or_else(|| Self::unreachable(server))?;

        let Some(records) = data.zones.get_mut(&zone_key(&record.zone)) else {
            return Err(StoreError::ZoneNotFound {
                server: server.to_string(),
                zone: record.zone,
                raw_message: Some("Generic failure".to_string()),
            });
        };

        let duplicate = RecordFilter::owned_by(record.kind, record.owner.clone())
            .with_data(record.data.clone());
        if records.iter().any(|r| duplicate.matches(r)) {
            return Err(StoreError::RecordExists {
                server: server.to_string(),
                owner: record.owner,
                raw_message: None,
            });
        }

        log::debug!(
            "[memory] {server}: add {} {} -> {}",
            record.kind.mnemonic(),
            record.owner,
            record.data
        );
        records.push(record);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, server: &str, filter: &RecordFilter) -> Result<u32> {
        let mut servers = self.servers.write().await;
        let data = servers
            .get_mut(&server_key(server))
            .ok_or_else(|| Self::unreachable(server))?;

        let removed = data.remove_matching(filter);
        if removed > 0 {
            log::debug!(
                "[memory] {server}: removed {removed} {} record(s) owned by {}",
                filter.kind.mnemonic(),
                filter.owner
            );
            self.mutations.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}

fn zone_key(zone: &str) -> String {
    normalize_domain_name(zone).to_ascii_lowercase()
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn id(&self) -> &'static str {
        "memory"
    }

    async fn create_a_record(&self, server: &str, spec: &ARecordSpec) -> Result<()> {
        self.insert(
            server,
            StoredRecord {
                kind: RecordKind::A,
                zone: normalize_domain_name(&spec.zone),
                owner: normalize_domain_name(&spec.owner).to_ascii_lowercase(),
                data: spec.address.to_string(),
            },
        )
        .await
    }

    async fn delete_a_record(&self, server: &str, owner: &str) -> Result<u32> {
        self.remove(server, &RecordFilter::owned_by(RecordKind::A, owner))
            .await
    }

    async fn create_ptr_record(&self, server: &str, spec: &PtrRecordSpec) -> Result<()> {
        self.insert(
            server,
            StoredRecord {
                kind: RecordKind::Ptr,
                zone: normalize_domain_name(&spec.zone),
                owner: normalize_domain_name(&spec.owner),
                data: to_rooted_name(&spec.target),
            },
        )
        .await
    }

    async fn delete_ptr_record(&self, server: &str, owner: &str, target: &str) -> Result<u32> {
        let filter = RecordFilter::owned_by(RecordKind::Ptr, owner).with_data(target);
        self.remove(server, &filter).await
    }

    async fn query_records(
        &self,
        server: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<StoredRecord>> {
        let servers = self.servers.read().await;
        let data = servers
            .get(&server_key(server))
            .ok_or_else(|| Self::unreachable(server))?;
        Ok(data.records().filter(|r| filter.matches(r)).cloned().collect())
    }
}
