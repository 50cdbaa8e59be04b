//! CIM error mapping

use crate::error::StoreError;
use crate::traits::{ErrorContext, RawStoreError, StoreErrorMapper};

use super::CimRecordStore;

/// Pull the first `0x????????` status code out of a PowerShell error record.
pub(crate) fn extract_status_code(message: &str) -> Option<String> {
    let lower = message.to_ascii_lowercase();
    let mut rest = lower.as_str();
    while let Some(pos) = rest.find("0x") {
        let candidate = &rest[pos + 2..];
        let digits = candidate
            .chars()
            .take_while(char::is_ascii_hexdigit)
            .count();
        if digits == 8 {
            return Some(format!("0x{}", &candidate[..8]));
        }
        rest = candidate;
    }
    None
}

/// Build a raw error from a failed script's error stream.
pub(crate) fn raw_error(stderr: &str) -> RawStoreError {
    let message = first_error_line(stderr);
    match extract_status_code(stderr) {
        Some(code) => RawStoreError::with_code(code, message),
        None => RawStoreError::new(message),
    }
}

/// The first line of a PowerShell error record carries the message;
/// `Cmdlet : ` prefixes are stripped.
fn first_error_line(stderr: &str) -> String {
    let line = stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Unknown error");
    match line.split_once(" : ") {
        Some((cmdlet, message)) if !cmdlet.contains(' ') => message.trim().to_string(),
        _ => line.to_string(),
    }
}

/// WMI / Win32 status code mapping
/// Reference: <https://learn.microsoft.com/windows/win32/wmisdk/wmi-error-constants>
impl StoreErrorMapper for CimRecordStore {
    fn map_error(&self, raw: RawStoreError, context: ErrorContext) -> StoreError {
        let server = context.server.clone();
        let message = raw.message.to_ascii_lowercase();

        match raw.code.as_deref() {
            // 0x800706ba: RPC_S_SERVER_UNAVAILABLE
            // 0x8004100e: WBEM_E_INVALID_NAMESPACE (DNS server role not installed)
            Some("0x800706ba" | "0x8004100e") => StoreError::ConnectionFailed {
                server,
                detail: raw.message,
            },

            // 0x80070005: E_ACCESSDENIED
            // 0x80041003: WBEM_E_ACCESS_DENIED
            Some("0x80070005" | "0x80041003") => StoreError::PermissionDenied {
                server,
                raw_message: Some(raw.message),
            },

            // 0x80041017: WBEM_E_INVALID_QUERY
            Some("0x80041017") => StoreError::InvalidParameter {
                server,
                param: "filter".to_string(),
                detail: raw.message,
            },

            // 0x80041008: WBEM_E_INVALID_PARAMETER
            Some("0x80041008") => StoreError::InvalidParameter {
                server,
                param: "owner".to_string(),
                detail: raw.message,
            },

            // 0x80041001: WBEM_E_FAILED, reported when the container zone does not exist
            Some("0x80041001") if context.zone.is_some() => StoreError::ZoneNotFound {
                server,
                zone: context.zone.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // No status code: fall back to the message text
            _ if message.contains("rpc server is unavailable") => StoreError::ConnectionFailed {
                server,
                detail: raw.message,
            },
            _ if message.contains("access is denied") => StoreError::PermissionDenied {
                server,
                raw_message: Some(raw.message),
            },
            _ if message.contains("already exists") => StoreError::RecordExists {
                server,
                owner: context
                    .owner
                    .clone()
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },
            _ if message.contains("generic failure") && context.zone.is_some() => {
                StoreError::ZoneNotFound {
                    server,
                    zone: context.zone.clone().unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            // Other error fallback
            _ => self.unknown_error(raw, &context),
        }
    }
}
