//! 记录操作请求类型定义

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use dns_record_provider::RecordKind;

/// One requested record mutation, as received on the wire.
///
/// Every field is optional so that a missing value surfaces as a validation
/// failure for this item instead of rejecting the whole payload. PascalCase
/// field names are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordActionRequest {
    /// `add` or `delete` (case-insensitive)
    #[serde(default, alias = "Action", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// `AType` or `PTRType` (case-insensitive)
    #[serde(default, alias = "RecordType", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    /// 完全限定主机名
    #[serde(default, alias = "Hostname", skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// 点分十进制 IPv4 地址
    #[serde(default, alias = "IpAddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// 区域（PTR 添加时必填）
    #[serde(default, alias = "DnsZone", skip_serializing_if = "Option::is_none")]
    pub dns_zone: Option<String>,
    /// 请求人
    #[serde(default, alias = "RequestOwner", skip_serializing_if = "Option::is_none")]
    pub request_owner: Option<String>,
    /// 备注
    #[serde(default, alias = "Note", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RecordActionRequest {
    /// Build a request from its action, record type, hostname and address.
    pub fn new(
        action: impl Into<String>,
        record_type: impl Into<String>,
        hostname: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            action: Some(action.into()),
            record_type: Some(record_type.into()),
            hostname: Some(hostname.into()),
            ip_address: Some(ip_address.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.dns_zone = Some(zone.into());
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.request_owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for RecordActionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |value: &Option<String>| value.as_deref().unwrap_or_default().to_string();
        write!(
            f,
            "Action: {}, RecordType: {}, Hostname: {}, IpAddress: {}, RequestOwner: {}, Note: {}",
            field(&self.action),
            field(&self.record_type),
            field(&self.hostname),
            field(&self.ip_address),
            field(&self.request_owner),
            field(&self.note),
        )
    }
}

/// Request payload: the batch of actions for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(default, alias = "DnsActions")]
    pub dns_actions: Option<Vec<RecordActionRequest>>,
}

impl BatchRequest {
    pub fn new(actions: Vec<RecordActionRequest>) -> Self {
        Self {
            dns_actions: Some(actions),
        }
    }

    /// Actions of the batch, `None` when the list is missing or empty.
    pub fn actions(&self) -> Option<&[RecordActionRequest]> {
        self.dns_actions
            .as_deref()
            .filter(|actions| !actions.is_empty())
    }
}

/// One entry of a raw JSON payload.
///
/// Entries are read one by one and leniently: field names match without
/// regard to case, and numbers and booleans are taken as their text. An entry
/// that still cannot be read keeps the fields that could be read, plus the
/// reason, so it is reported on its own instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadItem {
    pub request: RecordActionRequest,
    /// 无法读取的原因
    pub unreadable: Option<String>,
}

impl From<RecordActionRequest> for PayloadItem {
    fn from(request: RecordActionRequest) -> Self {
        Self {
            request,
            unreadable: None,
        }
    }
}

impl PayloadItem {
    /// Read the action list of a raw payload.
    ///
    /// A payload without an action list (or whose list is not an array)
    /// yields no item; only text that is not JSON at all is an error.
    pub fn read_all(payload: &str) -> serde_json::Result<Vec<Self>> {
        let value: Value = serde_json::from_str(payload)?;
        let items = value
            .as_object()
            .and_then(|object| lookup(object, "dnsActions"))
            .and_then(Value::as_array)
            .map(|actions| actions.iter().map(Self::read).collect())
            .unwrap_or_default();
        Ok(items)
    }

    /// Read one entry of the action list.
    pub fn read(value: &Value) -> Self {
        let Value::Object(object) = value else {
            return Self {
                request: RecordActionRequest::default(),
                unreadable: Some(format!(
                    "entry must be a JSON object, found {}",
                    json_kind(value)
                )),
            };
        };

        let mut problems = Vec::new();
        let mut text = |name: &str| {
            text_field(object, name).unwrap_or_else(|problem| {
                problems.push(problem);
                None
            })
        };
        let request = RecordActionRequest {
            action: text("action"),
            record_type: text("recordType"),
            hostname: text("hostname"),
            ip_address: text("ipAddress"),
            dns_zone: text("dnsZone"),
            request_owner: text("requestOwner"),
            note: text("note"),
        };

        Self {
            request,
            unreadable: (!problems.is_empty()).then(|| problems.join("; ")),
        }
    }
}

/// Field `name`, exact match first, then ignoring case.
fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn text_field(object: &Map<String, Value>, name: &str) -> Result<Option<String>, String> {
    match lookup(object, name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(Value::Bool(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(format!(
            "field '{name}' must be a text value, found {}",
            json_kind(other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 记录操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    Add,
    Delete,
}

impl RecordAction {
    /// Parse `add` / `delete`, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("add") {
            Some(Self::Add)
        } else if value.eq_ignore_ascii_case("delete") {
            Some(Self::Delete)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for RecordAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that passed validation: enums parsed, strings trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub action: RecordAction,
    pub kind: RecordKind,
    pub hostname: String,
    pub ip_address: String,
    /// 非空时才为 `Some`
    pub zone: Option<String>,
    pub request_owner: String,
    pub note: String,
}

impl ValidatedRequest {
    /// Progress line written before the store is called.
    pub fn progress_message(&self) -> &'static str {
        match (self.action, self.kind) {
            (RecordAction::Add, RecordKind::A) => "Adding type A DNS record...",
            (RecordAction::Delete, RecordKind::A) => "Deleting type A DNS record...",
            (RecordAction::Add, RecordKind::Ptr) => "Adding type PTR DNS record...",
            (RecordAction::Delete, RecordKind::Ptr) => "Deleting type PTR DNS record...",
        }
    }
}
