use serde::{Deserialize, Serialize};

/// Unified error type for all record store operations.
///
/// Each variant includes a `server` field identifying the DNS server the call
/// was addressed to, plus variant-specific context. All variants are
/// serializable for structured error reporting.
///
/// The message returned by the remote server is always preserved: it is the
/// text an operator needs to diagnose a failed mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum StoreError {
    /// The DNS server could not be reached (RPC endpoint down, host unknown,
    /// management shell could not be started, etc.).
    ConnectionFailed {
        /// Server the call was addressed to.
        server: String,
        /// Error details.
        detail: String,
    },

    /// The caller lacks permission on the DNS server.
    PermissionDenied {
        /// Server the call was addressed to.
        server: String,
        /// Original error message from the server, if available.
        raw_message: Option<String>,
    },

    /// The target zone does not exist on the server.
    ZoneNotFound {
        /// Server the call was addressed to.
        server: String,
        /// Zone that was not found.
        zone: String,
        /// Original error message from the server, if available.
        raw_message: Option<String>,
    },

    /// A record with the same owner and data already exists.
    RecordExists {
        /// Server the call was addressed to.
        server: String,
        /// Owner name of the conflicting record.
        owner: String,
        /// Original error message from the server, if available.
        raw_message: Option<String>,
    },

    /// A parameter was rejected by the server (malformed owner name, bad query, etc.).
    InvalidParameter {
        /// Server the call was addressed to.
        server: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The call did not complete within the allotted time.
    Timeout {
        /// Server the call was addressed to.
        server: String,
        /// Error details.
        detail: String,
    },

    /// Failed to parse the server's response.
    ParseError {
        /// Server the call was addressed to.
        server: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// An unrecognized error from the server.
    ///
    /// This is a catch-all for failures not yet mapped to a specific variant.
    Unknown {
        /// Server the call was addressed to.
        server: String,
        /// Raw error code, if available.
        raw_code: Option<String>,
        /// Raw error message.
        raw_message: String,
    },
}

impl StoreError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. }
                | Self::ZoneNotFound { .. }
                | Self::RecordExists { .. }
                | Self::InvalidParameter { .. }
        )
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed { server, detail } => {
                write!(f, "[{server}] Connection failed: {detail}")
            }
            Self::PermissionDenied {
                server,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{server}] Permission denied: {msg}")
                } else {
                    write!(f, "[{server}] Permission denied")
                }
            }
            Self::ZoneNotFound {
                server,
                zone,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{server}] Zone '{zone}' not found: {msg}")
                } else {
                    write!(f, "[{server}] Zone '{zone}' not found")
                }
            }
            Self::RecordExists {
                server,
                owner,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{server}] Record '{owner}' already exists: {msg}")
                } else {
                    write!(f, "[{server}] Record '{owner}' already exists")
                }
            }
            Self::InvalidParameter {
                server,
                param,
                detail,
            } => {
                write!(f, "[{server}] Invalid parameter '{param}': {detail}")
            }
            Self::Timeout { server, detail } => {
                write!(f, "[{server}] Request timeout: {detail}")
            }
            Self::ParseError { server, detail } => {
                write!(f, "[{server}] Parse error: {detail}")
            }
            Self::Unknown {
                server,
                raw_message,
                ..
            } => {
                write!(f, "[{server}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Convenience type alias for `Result<T, StoreError>`.
pub type Result<T> = std::result::Result<T, StoreError>;
