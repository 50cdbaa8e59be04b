use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

// ============ Record Types ============

/// DNS record kinds handled by the record stores.
///
/// The wire names (`"AType"`, `"PTRType"`) match the record class names
/// exposed by the Windows DNS server (`MicrosoftDNS_AType`, `MicrosoftDNS_PTRType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Host record: hostname → IPv4 address.
    #[serde(rename = "AType")]
    A,
    /// Reverse-lookup record: reversed IP owner → hostname.
    #[serde(rename = "PTRType")]
    Ptr,
}

impl RecordKind {
    /// Parse a wire name case-insensitively (`"atype"`, `"PTRType"`, ...).
    pub fn from_wire_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("atype") {
            Some(Self::A)
        } else if name.eq_ignore_ascii_case("ptrtype") {
            Some(Self::Ptr)
        } else {
            None
        }
    }

    /// Canonical wire name.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::A => "AType",
            Self::Ptr => "PTRType",
        }
    }

    /// Short DNS mnemonic used in log and progress messages.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ptr => "PTR",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A record as reported by a store query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    /// Record kind.
    pub kind: RecordKind,
    /// Zone (container) holding the record.
    pub zone: String,
    /// Owner name (`host.example.com` or `9.0.2.10.in-addr.arpa`).
    pub owner: String,
    /// Record data: the IPv4 address for A records, the target host for PTR records.
    pub data: String,
}

/// Parameters for creating an A record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ARecordSpec {
    /// Forward zone the record is created in.
    pub zone: String,
    /// Fully-qualified owner name.
    pub owner: String,
    /// Address the owner resolves to.
    pub address: Ipv4Addr,
}

/// Parameters for creating a PTR record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PtrRecordSpec {
    /// Reverse zone the record is created in (e.g. `"0.2.10.in-addr.arpa"`).
    pub zone: String,
    /// Reversed owner name (e.g. `"9.0.2.10.in-addr.arpa"`).
    pub owner: String,
    /// Host the owner points to.
    pub target: String,
}

/// Typed record query.
///
/// Matching is case-insensitive and ignores a trailing root dot on names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    /// Record kind to match.
    pub kind: RecordKind,
    /// Owner name to match.
    pub owner: String,
    /// Optional record data to match (target host for PTR, address for A).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl RecordFilter {
    /// All records of `kind` owned by `owner`.
    pub fn owned_by(kind: RecordKind, owner: impl Into<String>) -> Self {
        Self {
            kind,
            owner: owner.into(),
            data: None,
        }
    }

    /// Restrict the filter to records carrying `data`.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Whether `record` satisfies this filter.
    pub fn matches(&self, record: &StoredRecord) -> bool {
        record.kind == self.kind
            && names_equal(&record.owner, &self.owner)
            && self
                .data
                .as_deref()
                .is_none_or(|data| names_equal(&record.data, data))
    }
}

/// Compare two DNS names case-insensitively, ignoring a trailing root dot.
pub(crate) fn names_equal(left: &str, right: &str) -> bool {
    left.trim_end_matches('.')
        .eq_ignore_ascii_case(right.trim_end_matches('.'))
}

// ============ Store Selection ============

/// Which record store implementation to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreBackend {
    /// Windows DNS server WMI provider driven through PowerShell CIM cmdlets.
    /// Requires feature `cim`.
    #[cfg(feature = "cim")]
    Cim {
        /// PowerShell executable (defaults to `powershell.exe`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shell: Option<String>,
    },
    /// Process-local store. Requires feature `memory`.
    #[cfg(feature = "memory")]
    Memory {
        /// Servers the store answers for; every other server is unreachable.
        #[serde(default)]
        servers: Vec<MemoryServerSeed>,
    },
}

/// Initial content of one server of the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryServerSeed {
    /// Server name (`"."` for the local server).
    pub name: String,
    /// Zones hosted by the server.
    #[serde(default)]
    pub zones: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kind_parses_case_insensitively() {
        assert_eq!(RecordKind::from_wire_name("AType"), Some(RecordKind::A));
        assert_eq!(RecordKind::from_wire_name("atype"), Some(RecordKind::A));
        assert_eq!(RecordKind::from_wire_name(" PTRTYPE "), Some(RecordKind::Ptr));
        assert_eq!(RecordKind::from_wire_name("A"), None);
        assert_eq!(RecordKind::from_wire_name(""), None);
    }

    #[test]
    fn record_kind_serializes_wire_name() {
        assert_eq!(
            serde_json::to_string(&RecordKind::Ptr).unwrap(),
            "\"PTRType\""
        );
        let kind: RecordKind = serde_json::from_str("\"AType\"").unwrap();
        assert_eq!(kind, RecordKind::A);
    }

    #[test]
    fn filter_ignores_case_and_root_dot() {
        let record = StoredRecord {
            kind: RecordKind::Ptr,
            zone: "0.2.10.in-addr.arpa".to_string(),
            owner: "9.0.2.10.in-addr.arpa".to_string(),
            data: "Web01.Corp.Example.com.".to_string(),
        };

        let filter = RecordFilter::owned_by(RecordKind::Ptr, "9.0.2.10.IN-ADDR.ARPA")
            .with_data("web01.corp.example.com");
        assert!(filter.matches(&record));

        let other_target = RecordFilter::owned_by(RecordKind::Ptr, "9.0.2.10.in-addr.arpa")
            .with_data("web02.corp.example.com");
        assert!(!other_target.matches(&record));

        let wrong_kind = RecordFilter::owned_by(RecordKind::A, "9.0.2.10.in-addr.arpa");
        assert!(!wrong_kind.matches(&record));
    }

    #[cfg(all(feature = "cim", feature = "memory"))]
    #[test]
    fn backend_deserializes_from_tagged_json() {
        let backend: StoreBackend =
            serde_json::from_str(r#"{"kind":"cim","shell":"pwsh"}"#).unwrap();
        assert_eq!(
            backend,
            StoreBackend::Cim {
                shell: Some("pwsh".to_string())
            }
        );

        let backend: StoreBackend = serde_json::from_str(
            r#"{"kind":"memory","servers":[{"name":".","zones":["corp.example.com"]}]}"#,
        )
        .unwrap();
        let StoreBackend::Memory { servers } = backend else {
            panic!("expected memory backend");
        };
        assert_eq!(servers[0].zones, vec!["corp.example.com".to_string()]);
    }
}
