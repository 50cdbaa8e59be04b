//! Configuration and payload loading

use std::path::Path;

use anyhow::{Context, bail};
use tokio::io::AsyncReadExt;

use dns_record_core::HandlerConfig;

use crate::cli::STDIN_SOURCE;

const MAX_INPUT_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Load the handler configuration; defaults when no file is given.
pub async fn load_config(
    path: Option<&Path>,
    dns_server: Option<&str>,
) -> anyhow::Result<HandlerConfig> {
    let mut config = match path {
        Some(path) => {
            let text = read_file(path).await?;
            HandlerConfig::from_json(&text)
                .with_context(|| format!("Invalid configuration file {}", path.display()))?
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            HandlerConfig::default()
        }
    };

    if let Some(server) = dns_server.map(str::trim).filter(|s| !s.is_empty()) {
        config.dns_server = server.to_string();
    }

    tracing::debug!(
        "Default DNS server: {}, {} route(s), store timeout {}s",
        config.dns_server,
        config.routes.len(),
        config.store_timeout_secs
    );
    Ok(config)
}

/// Read the request payload from a file, or from stdin for `-`.
///
/// Bytes that are not valid UTF-8 are replaced, so a stray byte only spoils
/// the value it appears in.
pub async fn read_payload(source: &str) -> anyhow::Result<String> {
    if source == STDIN_SOURCE {
        tracing::debug!("Reading request payload from stdin");
        let mut payload = Vec::new();
        tokio::io::stdin()
            .take(MAX_INPUT_SIZE + 1)
            .read_to_end(&mut payload)
            .await
            .context("Failed to read request payload from stdin")?;
        if payload.len() as u64 > MAX_INPUT_SIZE {
            bail!("Request payload exceeds {MAX_INPUT_SIZE} bytes");
        }
        return Ok(decode(payload, "stdin"));
    }
    read_file(Path::new(source)).await
}

async fn read_file(path: &Path) -> anyhow::Result<String> {
    // Check file size before reading
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if metadata.len() > MAX_INPUT_SIZE {
        bail!(
            "{} is too large ({} bytes, max {MAX_INPUT_SIZE})",
            path.display(),
            metadata.len()
        );
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decode(bytes, &path.display().to_string()))
}

fn decode(bytes: Vec<u8>, source: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{source} is not valid UTF-8, invalid bytes were replaced");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
