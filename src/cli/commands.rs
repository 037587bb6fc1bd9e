//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Customer.io App API source
#[derive(Parser, Debug)]
#[command(name = "customerio-source")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Pretty-print messages instead of one JSON object per line
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Test connection to the API
    Check,

    /// Emit the catalog of all streams
    Discover,

    /// List available stream names
    Streams,

    /// Read data from streams
    Read {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,
    },
}

impl Commands {
    /// Stream names selected by `read --streams`, or `None` for all
    pub fn stream_filter(&self) -> Option<Vec<String>> {
        match self {
            Self::Read {
                streams: Some(list),
            } => {
                let names: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                (!names.is_empty()).then_some(names)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_read_with_streams() {
        let cli = Cli::parse_from([
            "customerio-source",
            "--config",
            "config.yaml",
            "read",
            "--streams",
            "campaigns, campaign_metrics",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("config.yaml")));
        assert_eq!(
            cli.command.stream_filter(),
            Some(vec!["campaigns".to_string(), "campaign_metrics".to_string()])
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "customerio-source",
            "check",
            "--config-json",
            r#"{"app_api_key":"k","region":"US"}"#,
            "-v",
        ]);

        assert_eq!(cli.command, Commands::Check);
        assert!(cli.verbose);
        assert!(cli.config_json.is_some());
    }

    #[test_case(&["customerio-source", "read"] ; "no filter")]
    #[test_case(&["customerio-source", "read", "--streams", ""] ; "empty filter")]
    #[test_case(&["customerio-source", "read", "--streams", " , "] ; "blank names")]
    #[test_case(&["customerio-source", "discover"] ; "not a read")]
    fn test_no_stream_filter(args: &[&str]) {
        let cli = Cli::parse_from(args);
        assert_eq!(cli.command.stream_filter(), None);
    }
}
