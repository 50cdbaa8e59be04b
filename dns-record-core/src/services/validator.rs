//! 请求参数校验

use dns_record_provider::RecordKind;

use crate::error::ValidationError;
use crate::types::{RecordAction, RecordActionRequest, ValidatedRequest};

/// Non-blank, trimmed value of an optional field.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Validate one request.
///
/// Checks run in a fixed order; the first failure is returned:
/// 1. action is `add` or `delete`
/// 2. record type is `AType` or `PTRType`
/// 3. request owner is not blank
/// 4. note is not blank
/// 5. hostname and IP address are both not blank
pub fn validate(request: &RecordActionRequest) -> Result<ValidatedRequest, ValidationError> {
    let result = check(request);
    if let Err(e) = &result {
        log::warn!("Request rejected: {e} ({request})");
    }
    result
}

/// Whether `request` passes [`validate`].
pub fn is_valid(request: &RecordActionRequest) -> bool {
    check(request).is_ok()
}

fn check(request: &RecordActionRequest) -> Result<ValidatedRequest, ValidationError> {
    let action = request
        .action
        .as_deref()
        .and_then(RecordAction::parse)
        .ok_or(ValidationError::InvalidAction)?;

    let kind = request
        .record_type
        .as_deref()
        .and_then(RecordKind::from_wire_name)
        .ok_or(ValidationError::InvalidRecordType)?;

    let request_owner =
        non_blank(request.request_owner.as_ref()).ok_or(ValidationError::MissingRequestOwner)?;

    let note = non_blank(request.note.as_ref()).ok_or(ValidationError::MissingNote)?;

    let (Some(hostname), Some(ip_address)) = (
        non_blank(request.hostname.as_ref()),
        non_blank(request.ip_address.as_ref()),
    ) else {
        return Err(ValidationError::MissingHostnameOrAddress);
    };

    Ok(ValidatedRequest {
        action,
        kind,
        hostname: hostname.to_string(),
        ip_address: ip_address.to_string(),
        zone: non_blank(request.dns_zone.as_ref()).map(str::to_string),
        request_owner: request_owner.to_string(),
        note: note.to_string(),
    })
}
