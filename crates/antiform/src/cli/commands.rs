//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::pages::PageId;

/// Play command arguments.
#[derive(Debug, Args)]
pub struct PlayCommand {
    /// Page to start on
    #[arg(short, long, value_enum, default_value = "home")]
    pub from: PageArg,

    /// Seed for reproducible runs (overrides the configured seed)
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Error log commands.
#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// List every logged error
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Show the print layout of the log
    Print,

    /// Export the log as a snapshot card
    Export {
        /// Directory to write into (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Remove every logged error
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Page argument for `--from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageArg {
    /// Word CAPTCHA home page
    Home,
    /// URL input
    Url,
    /// Password input
    Password,
    /// Pizza topping checkboxes
    Checkbox,
    /// Range slider
    Range,
    /// Color picker
    Color,
    /// Date picker
    Date,
    /// File upload
    File,
    /// Input type CAPTCHA
    Captcha,
}

impl From<PageArg> for PageId {
    fn from(arg: PageArg) -> Self {
        match arg {
            PageArg::Home => Self::Home,
            PageArg::Url => Self::Url,
            PageArg::Password => Self::Password,
            PageArg::Checkbox => Self::Checkbox,
            PageArg::Range => Self::Range,
            PageArg::Color => Self::ColorPicker,
            PageArg::Date => Self::DatePicker,
            PageArg::File => Self::File,
            PageArg::Captcha => Self::Captcha,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
