//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for xmlrelay using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// xmlrelay - partner XML feed to CSV relay over SFTP
#[derive(Parser, Debug)]
#[command(name = "xmlrelay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to ./xmlrelay.toml when present)
    #[arg(short, long, env = "XMLRELAY_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "XMLRELAY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the partner XML, convert it and publish the CSV
    Run(commands::run::RunArgs),

    /// Convert a local XML file to CSV without remote access
    Convert(commands::convert::ConvertArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// List a remote directory with entry types and sizes
    ListRemote(commands::list::ListRemoteArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["xmlrelay", "run"]);
        assert!(matches!(cli.command, Commands::Run(ref args) if !args.dry_run));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from(["xmlrelay", "run", "--dry-run", "--keep-artifacts", "out"]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.dry_run);
                assert_eq!(args.keep_artifacts.as_deref(), Some("out"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["xmlrelay", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["xmlrelay", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from(["xmlrelay", "convert", "--input", "feed.xml"]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, std::path::PathBuf::from("feed.xml"));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["xmlrelay", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["xmlrelay", "init"]);
        match cli.command {
            Commands::Init(args) => assert_eq!(args.output, "xmlrelay.toml"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_list_remote() {
        let cli = Cli::parse_from(["xmlrelay", "list-remote", "/bi/incoming", "--xml-only"]);
        match cli.command {
            Commands::ListRemote(args) => {
                assert_eq!(args.dir.as_deref(), Some("/bi/incoming"));
                assert!(args.xml_only);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["xmlrelay", "list-remote"]);
        assert!(matches!(cli.command, Commands::ListRemote(ref args) if args.dir.is_none()));
    }

    #[test]
    fn test_convert_requires_input() {
        assert!(Cli::try_parse_from(["xmlrelay", "convert"]).is_err());
    }
}
