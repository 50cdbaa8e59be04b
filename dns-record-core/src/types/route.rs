//! DNS 服务器路由类型定义

use serde::{Deserialize, Serialize};

/// Maps a domain suffix to the DNS server that hosts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsServerRoute {
    /// 域名后缀（不区分大小写）
    #[serde(alias = "DomainSuffix")]
    pub domain_suffix: String,
    /// DNS 服务器名称
    #[serde(alias = "ServerName")]
    pub server_name: String,
}

impl DnsServerRoute {
    pub fn new(domain_suffix: impl Into<String>, server_name: impl Into<String>) -> Self {
        Self {
            domain_suffix: domain_suffix.into(),
            server_name: server_name.into(),
        }
    }

    /// Whether this route serves `suffix` (case-insensitive).
    pub fn matches(&self, suffix: &str) -> bool {
        self.domain_suffix.trim().eq_ignore_ascii_case(suffix.trim())
    }
}
