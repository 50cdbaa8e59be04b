//! DNS 服务器路由

use dns_record_provider::LOCAL_SERVER;

use crate::error::ResolutionError;
use crate::types::DnsServerRoute;
use crate::utils::dns_names::domain_suffix;

/// Resolve the server for `hostname` from an ordered route table.
///
/// The suffix is everything after the first `.` of the hostname. Routes are
/// scanned in order and the first case-insensitive match wins.
pub fn resolve_server<'a>(
    routes: &'a [DnsServerRoute],
    hostname: &str,
) -> Result<&'a str, ResolutionError> {
    let suffix = domain_suffix(hostname);
    if suffix.is_empty() {
        return Err(ResolutionError::DomainSuffixInvalid {
            hostname: hostname.to_string(),
        });
    }

    routes
        .iter()
        .find(|route| route.matches(suffix))
        .map(|route| route.server_name.as_str())
        .ok_or_else(|| ResolutionError::NoMatchingServer {
            suffix: suffix.to_string(),
        })
}

/// Route table plus the default server.
///
/// With no route configured every hostname goes to the default server;
/// otherwise the table is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerResolver {
    routes: Vec<DnsServerRoute>,
    default_server: String,
}

impl ServerResolver {
    /// Create a resolver; a blank default server means the local server.
    pub fn new(routes: Vec<DnsServerRoute>, default_server: &str) -> Self {
        let default_server = match default_server.trim() {
            "" => LOCAL_SERVER,
            server => server,
        };
        Self {
            routes,
            default_server: default_server.to_string(),
        }
    }

    pub fn default_server(&self) -> &str {
        &self.default_server
    }

    /// Server that hosts `hostname`.
    pub fn resolve(&self, hostname: &str) -> Result<&str, ResolutionError> {
        if self.routes.is_empty() {
            return Ok(&self.default_server);
        }
        let server = resolve_server(&self.routes, hostname)?;
        log::debug!("Resolved {hostname} to DNS server {server}");
        Ok(server)
    }
}
