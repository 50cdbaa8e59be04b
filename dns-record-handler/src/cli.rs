//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Payload source meaning standard input.
pub const STDIN_SOURCE: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "dns-record-handler")]
#[command(version)]
#[command(about = "Create and delete DNS A/PTR records on Windows DNS servers from a batch request")]
pub struct Cli {
    /// Handler configuration file (JSON)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request payload file, `-` reads standard input
    #[arg(short = 'p', long, value_name = "FILE", default_value = STDIN_SOURCE)]
    pub payload: String,

    /// Validate and resolve every action without changing any record
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Default DNS server, overrides the configuration file
    #[arg(long, value_name = "NAME")]
    pub dns_server: Option<String>,

    /// Print a sample configuration and request payload, then exit
    #[arg(long)]
    pub print_sample: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_read_stdin() {
        let cli = Cli::try_parse_from(["dns-record-handler"]).unwrap();
        assert_eq!(cli.payload, STDIN_SOURCE);
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.print_sample);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "dns-record-handler",
            "--config",
            "handler.json",
            "-p",
            "request.json",
            "--dry-run",
            "--dns-server",
            "dns01.corp.example.com",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("handler.json")));
        assert_eq!(cli.payload, "request.json");
        assert!(cli.dry_run);
        assert_eq!(cli.dns_server.as_deref(), Some("dns01.corp.example.com"));
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["dns-record-handler", "--wat"]).is_err());
    }
}
