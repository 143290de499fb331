//! Command-line interface for antiform.
//!
//! This module provides the CLI structure and command handlers for the
//! `antiform` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, LogCommand, OutputFormat, PageArg, PlayCommand, StatusCommand,
};

/// antiform - An obstacle course of form controls that refuse to cooperate
///
/// Every page unlocks after enough failures, whatever you type. Every
/// failure is written down.
#[derive(Debug, Parser)]
#[command(name = "antiform")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play the obstacle course
    Play(PlayCommand),

    /// Inspect, print, export or clear the error log
    #[command(subcommand)]
    Log(LogCommand),

    /// Show storage and error log status
    Status(StatusCommand),

    /// List the pages in tour order
    Pages,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Pages,
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "antiform");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_play_defaults() {
        let cli = Cli::try_parse_from(["antiform", "play"]).unwrap();
        let Command::Play(play) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(play.from, PageArg::Home);
        assert_eq!(play.seed, None);
    }

    #[test]
    fn test_parse_play_from_page() {
        let cli = Cli::try_parse_from(["antiform", "play", "--from", "color", "--seed", "9"]).unwrap();
        let Command::Play(play) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(play.from, PageArg::Color);
        assert_eq!(play.seed, Some(9));
    }

    #[test]
    fn test_parse_log_show_json() {
        let cli = Cli::try_parse_from(["antiform", "log", "show", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Log(LogCommand::Show {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_parse_log_export_dir() {
        let cli = Cli::try_parse_from(["antiform", "log", "export", "--dir", "/tmp/shots"]).unwrap();
        let Command::Log(LogCommand::Export { dir }) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(dir, Some(PathBuf::from("/tmp/shots")));
    }

    #[test]
    fn test_parse_unknown_page_fails() {
        assert!(Cli::try_parse_from(["antiform", "play", "--from", "nowhere"]).is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["antiform", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["antiform", "pages", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["antiform", "status", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
