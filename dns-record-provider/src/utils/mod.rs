//! Utility modules.

/// Log sanitization utilities to keep script bodies and shell output readable in logs.
pub mod log_sanitizer;
