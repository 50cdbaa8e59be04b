//! Log sanitization utilities
//!
//! Scripts and shell error streams can be long and span many lines; logs
//! get a single-line, length-capped rendering instead.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 512;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Collapse line breaks so one log entry stays on one line.
fn flatten_lines(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Truncate a string for safe logging.
///
/// Line breaks are collapsed to `" | "`. Returns the flattened string if it's
/// within the limit, otherwise the first `TRUNCATE_LIMIT` bytes with a suffix
/// indicating the total length of the original.
pub fn truncate_for_log(s: &str) -> String {
    let flat = flatten_lines(s);
    if flat.len() <= TRUNCATE_LIMIT {
        flat
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &flat[..floor_char_boundary(&flat, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}
