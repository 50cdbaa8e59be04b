//! DNS record handler command-line entry point
//!
//! Reads a batch of A/PTR record requests, applies them through the
//! configured record store and prints the JSON response on stdout.
//!
//! Logs go to stderr so stdout carries only the response. A response is
//! printed for every run that got past loading the configuration, even when
//! the payload could not be read. The exit code is 0 when the batch completed
//! (individual items may still have failed) and 1 otherwise.

mod cli;
mod config_loader;

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use dns_record_core::DnsRecordHandler;
use dns_record_core::HandlerConfig;
use dns_record_core::types::BatchStatus;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing to stderr (stdout carries the response)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if cli.print_sample {
        return print_sample();
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("DNS request execution has been aborted due to: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config =
        config_loader::load_config(cli.config.as_deref(), cli.dns_server.as_deref()).await?;
    let payload = config_loader::read_payload(&cli.payload)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Request payload is unusable, no DNS action will run: {e:#}");
            String::new()
        });

    let handler = DnsRecordHandler::from_config(&config);
    tracing::info!(
        "Starting DNS record handler v{}{}",
        env!("CARGO_PKG_VERSION"),
        if cli.dry_run { " (dry run)" } else { "" }
    );

    // Ctrl-C cancels the run; items not yet started are reported as cancelled
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling remaining DNS actions");
                cancel.cancel();
            }
        })
    };

    let response = handler.process_json(&payload, cli.dry_run, &cancel).await;
    interrupt.abort();

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.status == BatchStatus::Complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_sample() -> ExitCode {
    let sample = serde_json::json!({
        "config": HandlerConfig::sample(),
        "request": HandlerConfig::sample_request(),
    });
    match serde_json::to_string_pretty(&sample) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to render sample: {e}");
            ExitCode::FAILURE
        }
    }
}
