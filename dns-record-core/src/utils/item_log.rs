//! 单条请求的进度记录
//!
//! Each item owns its own log; lines are written to the `log` facade as they
//! are added and joined into the item's note at the end.

use crate::error::CoreError;

/// Per-item note builder
#[derive(Debug, Default)]
pub struct ItemLog {
    lines: Vec<String>,
}

impl ItemLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a progress line.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        if message.trim().is_empty() {
            return;
        }
        log::info!("{message}");
        self.lines.push(message);
    }

    /// Record a failure; expected failures are logged at `warn`.
    pub fn failure(&mut self, error: &CoreError) {
        let message = error.to_string();
        if error.is_expected() {
            log::warn!("{message}");
        } else {
            log::error!("{message}");
        }
        self.lines.push(message);
    }

    /// Lines joined with `\n`.
    pub fn into_note(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn joins_lines_in_order() {
        let mut log = ItemLog::new();
        log.info("Verifying request parameters...");
        log.info("   ");
        log.failure(&CoreError::from(ValidationError::MissingNote));
        assert_eq!(
            log.into_note(),
            "Verifying request parameters...\nrequest note must be specified"
        );
    }
}
