//! PowerShell execution tools
//!
//! Runs management scripts in a child PowerShell process and collects their
//! output. Stores build the script themselves; this module only owns the
//! process plumbing, logging, and output parsing.
//!
//! The child is spawned with `kill_on_drop`, so dropping the returned future
//! (timeout or cancellation in the caller) terminates the script.

use std::process::Stdio;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use tokio::process::Command;

use crate::error::StoreError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Preamble prepended to every script: fail fast, keep the progress stream quiet.
const SCRIPT_PREAMBLE: &str =
    "$ErrorActionPreference = 'Stop'\n$ProgressPreference = 'SilentlyContinue'\n";

/// Output of a finished script.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Captured standard output, trimmed.
    pub stdout: String,
    /// Captured standard error, trimmed.
    pub stderr: String,
}

/// Shell tool function set
pub struct ShellUtils;

impl ShellUtils {
    /// Runs a script and returns its output.
    ///
    /// # Arguments
    /// * `shell` - PowerShell executable (`powershell.exe`, `pwsh`)
    /// * `script` - script body (the preamble is added here)
    /// * `server` - target DNS server (for logging and errors)
    /// * `action` - short operation name (for logging)
    ///
    /// # Returns
    /// * `Ok(ScriptOutput)` - the process ran; check `success` before using `stdout`
    /// * `Err(StoreError::ConnectionFailed)` - the shell could not be started
    pub async fn execute_script(
        shell: &str,
        script: &str,
        server: &str,
        action: &str,
    ) -> Result<ScriptOutput, StoreError> {
        let script = format!("{SCRIPT_PREAMBLE}{script}");
        log::debug!("[cim] {server} {action}");
        log::trace!("[cim] Script: {}", truncate_for_log(&script));

        let output = Command::new(shell)
            .args([
                "-NoLogo",
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-EncodedCommand",
            ])
            .arg(encode_command(&script))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                server: server.to_string(),
                detail: format!("Failed to start {shell}: {e}"),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let success = output.status.success();

        log::debug!("[cim] {server} {action} exited with {}", output.status);
        if !stdout.is_empty() {
            log::debug!("[cim] Output: {}", truncate_for_log(&stdout));
        }
        if !success {
            log::debug!("[cim] Error output: {}", truncate_for_log(&stderr));
        }

        Ok(ScriptOutput {
            success,
            stdout,
            stderr,
        })
    }

    /// Parse JSON output
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(StoreError::ParseError)` - parsing failed
    pub fn parse_json<T>(output: &str, server: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(output).map_err(|e| {
            log::error!("[cim] {server} JSON parse failed: {e}");
            log::error!("[cim] Raw output: {}", truncate_for_log(output));
            StoreError::ParseError {
                server: server.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Parse the last non-empty output line as a record count.
    pub fn parse_count(output: &str, server: &str) -> Result<u32, StoreError> {
        let line = output
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .unwrap_or("0");
        line.parse::<u32>().map_err(|e| StoreError::ParseError {
            server: server.to_string(),
            detail: format!("expected a record count, got '{}': {e}", truncate_for_log(line)),
        })
    }
}

/// Encode a script for `-EncodedCommand` (base64 of UTF-16LE).
fn encode_command(script: &str) -> String {
    let bytes: Vec<u8> = script.encode_utf16().flat_map(u16::to_le_bytes).collect();
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_command_uses_utf16le() {
        assert_eq!(encode_command("a"), "YQA=");
        assert_eq!(encode_command("ab"), "YQBiAA==");
    }

    #[test]
    fn parse_count_takes_last_line() {
        assert!(matches!(ShellUtils::parse_count("2", "."), Ok(2)));
        assert!(matches!(ShellUtils::parse_count("warning text\n3\n\n", "."), Ok(3)));
        assert!(matches!(ShellUtils::parse_count("", "."), Ok(0)));
    }

    #[test]
    fn parse_count_rejects_garbage() {
        let result = ShellUtils::parse_count("not a number", "dns01");
        assert!(
            matches!(&result, Err(StoreError::ParseError { server, .. }) if server == "dns01"),
            "unexpected parse result: {result:?}"
        );
    }

    #[test]
    fn parse_json_valid() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Row {
            x: i32,
        }
        let result: Result<Vec<Row>, StoreError> = ShellUtils::parse_json(r#"[{"x":42}]"#, ".");
        assert!(
            matches!(&result, Ok(rows) if rows == &vec![Row { x: 42 }]),
            "unexpected parse result: {result:?}"
        );
    }

    #[test]
    fn parse_json_invalid() {
        let result: Result<Vec<i32>, StoreError> = ShellUtils::parse_json("not json", ".");
        assert!(
            matches!(&result, Err(StoreError::ParseError { .. })),
            "unexpected parse result: {result:?}"
        );
    }
}
