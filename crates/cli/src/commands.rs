//! CLI command definitions for chatlens.
//!
//! Provides the command-line interface for transcript analysis, latest-day
//! extraction, and configuration management.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "CHATLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute per-author statistics for a transcript
    Analyze(AnalyzeArgs),

    /// Extract the most recent day of a transcript
    LastDay(LastDayArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Transcript analysis arguments.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Exported transcript file
    pub transcript: PathBuf,

    /// Directory for per-author JSON reports
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Write per-author reports to the configured reports directory
    #[arg(long, conflicts_with = "out_dir")]
    pub write: bool,

    /// Summary output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Run aggregators one after another on the main thread
    #[arg(long)]
    pub sequential: bool,
}

/// Latest-day extraction arguments.
#[derive(Args, Debug)]
pub struct LastDayArgs {
    /// Exported transcript file
    pub transcript: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Rename an author, as "old name new" (repeatable)
    #[arg(short, long = "rename")]
    pub renames: Vec<String>,
}

/// Configuration management arguments.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration action
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the platform config directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Summary output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
