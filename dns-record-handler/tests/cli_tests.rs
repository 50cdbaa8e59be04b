#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Runs the built binary and checks what it prints on stdout.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

const BIN: &str = env!("CARGO_BIN_EXE_dns-record-handler");

fn run_with_stdin(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // The binary may exit before reading stdin
    let _ = child.stdin.take().unwrap().write_all(stdin);
    child.wait_with_output().unwrap()
}

fn response(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not a JSON response ({e}); stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

#[test]
fn invalid_utf8_stdin_still_gets_a_response() {
    let output = run_with_stdin(&["--dry-run"], b"{\"DnsActions\":[{\"Note\":\"\xff\xfe\"}]}");

    let json = response(&output);
    assert_eq!(json["status"], "Complete");
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["exitCode"], -1);
    assert!(
        results[0]["note"]
            .as_str()
            .unwrap()
            .ends_with("allowed action type is add or delete only")
    );
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_payload_file_reports_failed_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let output = run_with_stdin(&["--payload", path.to_str().unwrap()], b"");

    let json = response(&output);
    assert_eq!(json["status"], "Failed");
    assert!(json["results"].as_array().unwrap().is_empty());
    assert!(
        json["summary"]
            .as_str()
            .unwrap()
            .contains("no DNS action is found")
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn oversized_payload_reports_failed_batch() {
    let file = tempfile::NamedTempFile::new().unwrap();
    file.as_file().set_len(10 * 1024 * 1024 + 1).unwrap();
    let output = run_with_stdin(
        &["--dry-run", "--payload", file.path().to_str().unwrap()],
        b"",
    );

    let json = response(&output);
    assert_eq!(json["status"], "Failed");
    assert!(json["summary"].as_str().unwrap().contains("dry run"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let output = run_with_stdin(&["--config", path.to_str().unwrap()], b"");

    assert!(output.stdout.is_empty());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn print_sample_emits_config_and_request() {
    let output = run_with_stdin(&["--print-sample"], b"");

    let json = response(&output);
    assert!(json["config"].is_object());
    assert_eq!(json["request"]["dnsActions"].as_array().unwrap().len(), 2);
    assert_eq!(output.status.code(), Some(0));
}
