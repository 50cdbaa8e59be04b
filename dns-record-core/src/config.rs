//! Handler configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use dns_record_provider::LOCAL_SERVER;

use crate::error::{CoreError, CoreResult};
use crate::services::ServerResolver;
use crate::types::{BatchRequest, DnsServerRoute, RecordActionRequest, StoreBackend};

/// 默认存储调用超时（秒）
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 60;

fn default_dns_server() -> String {
    LOCAL_SERVER.to_string()
}

fn default_store_timeout_secs() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECS
}

fn default_store() -> StoreBackend {
    StoreBackend::Cim { shell: None }
}

/// Handler configuration, as declared by the host.
///
/// Unknown fields are ignored; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerConfig {
    /// Server used when no route table is configured (`"."` is the local server).
    #[serde(default = "default_dns_server", alias = "DnsServer")]
    pub dns_server: String,

    /// Ordered domain suffix → server routes; the first match wins.
    #[serde(default, alias = "Routes")]
    pub routes: Vec<DnsServerRoute>,

    /// Default zone for A records added without one.
    #[serde(default, alias = "JoinedDomain", skip_serializing_if = "Option::is_none")]
    pub joined_domain: Option<String>,

    /// Upper bound for each store call.
    #[serde(default = "default_store_timeout_secs", alias = "StoreTimeoutSecs")]
    pub store_timeout_secs: u64,

    /// Record store selection.
    #[serde(default = "default_store", alias = "Store")]
    pub store: StoreBackend,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            dns_server: default_dns_server(),
            routes: Vec::new(),
            joined_domain: None,
            store_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
            store: default_store(),
        }
    }
}

impl HandlerConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// Per-call store timeout; zero is raised to one second.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs.max(1))
    }

    /// Resolver over the configured routes and default server.
    pub fn server_resolver(&self) -> ServerResolver {
        ServerResolver::new(self.routes.clone(), &self.dns_server)
    }

    /// Example configuration shown to users.
    pub fn sample() -> Self {
        Self {
            dns_server: LOCAL_SERVER.to_string(),
            routes: vec![
                DnsServerRoute::new("corp.example.com", "dns01.corp.example.com"),
                DnsServerRoute::new("lab.example.com", "dns02.lab.example.com"),
            ],
            joined_domain: Some("corp.example.com".to_string()),
            store_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
            store: default_store(),
        }
    }

    /// Example request payload shown to users.
    pub fn sample_request() -> BatchRequest {
        let action = |record_type: &str| {
            RecordActionRequest::new(
                "delete",
                record_type,
                "FullQualifiedDomainName.com",
                "xxx.xxx.xxx.xxx",
            )
            .with_owner("XXXXXX")
            .with_note("Notes related to the request.")
        };
        BatchRequest::new(vec![action("AType"), action("PTRType")])
    }
}
