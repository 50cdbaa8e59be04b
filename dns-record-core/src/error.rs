//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use dns_record_provider::RecordKind;

// Re-export library error type
pub use dns_record_provider::StoreError;

/// Request field validation failure
///
/// Checks run in a fixed order and the first failing one is reported.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    #[error("allowed action type is add or delete only")]
    InvalidAction,

    #[error("allowed record types are AType or PTRType only")]
    InvalidRecordType,

    #[error("request owner must be specified")]
    MissingRequestOwner,

    #[error("request note must be specified")]
    MissingNote,

    #[error("both hostname and ip address must be specified")]
    MissingHostnameOrAddress,
}

/// Server routing failure
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ResolutionError {
    /// The hostname has no domain suffix (no `.`, or nothing after it).
    #[error("cannot determine the domain suffix of hostname '{hostname}'")]
    DomainSuffixInvalid { hostname: String },

    /// No route is configured for the hostname's domain suffix.
    #[error("no DNS server is configured for domain suffix '{suffix}'")]
    NoMatchingServer { suffix: String },
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Request validation error
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Server routing error
    #[error("{0}")]
    Resolution(#[from] ResolutionError),

    /// A payload entry could not be read as a request
    #[error("request cannot be read: {0}")]
    UnreadableRequest(String),

    /// No zone was given and none could be derived
    #[error("DNS zone is not specified.")]
    ZoneNotSpecified,

    /// The IP address is not a dotted-quad IPv4 address
    #[error("invalid IPv4 address '{0}'")]
    InvalidIpAddress(String),

    /// A delete matched no record
    #[error("DNS {} record is not found.", .0.mnemonic())]
    RecordNotFound(RecordKind),

    /// The run was cancelled before or while this item ran
    #[error("operation was cancelled")]
    Cancelled,

    /// The payload carried no action
    #[error("no DNS action is found from the incoming request")]
    MalformedBatch,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Store error (converting from library), message preserved verbatim
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::Resolution(_)
            | Self::UnreadableRequest(_)
            | Self::ZoneNotSpecified
            | Self::InvalidIpAddress(_)
            | Self::RecordNotFound(_)
            | Self::Cancelled
            | Self::MalformedBatch => true,
            Self::Store(e) => e.is_expected(),
            Self::ConfigError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
