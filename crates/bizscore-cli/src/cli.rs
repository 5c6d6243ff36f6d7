//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bizscore CLI - Evaluate business-diagnosis submissions.
#[derive(Debug, Parser)]
#[command(name = "bizscore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.bizscore/config.toml)
    #[arg(short, long, global = true, env = "BIZSCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use a built-in pipeline preset instead of the configuration file
    #[arg(short, long, value_enum, global = true)]
    pub preset: Option<PresetArg>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per result)
    Quiet,
}

/// Built-in pipeline presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced retries, standard validation
    Default,
    /// Stricter report checks, fewer retries
    Strict,
    /// More retries, permissive checks
    Lenient,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate one diagnosis through the full pipeline
    Run(RunArgs),

    /// Evaluate many diagnoses concurrently
    Batch(BatchArgs),

    /// Score answers directly, without retrieval or reporting
    Score(ScoreArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Where diagnosis records come from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// JSON file holding an array of records
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    pub records: Option<PathBuf>,

    /// Base URL of the record service
    #[arg(long)]
    pub url: Option<String>,

    /// Bearer token for the record service
    #[arg(long, env = "BIZSCORE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Append successful evaluations to this JSON Lines file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Diagnosis identifier (e.g. DX-20250301-0042)
    pub identifier: String,

    /// Record source and output
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the rendered report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Diagnosis identifiers
    pub identifiers: Vec<String>,

    /// Read identifiers from file (one per line)
    #[arg(long)]
    pub ids_file: Option<PathBuf>,

    /// Record source and output
    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum concurrent runs (overrides the configuration)
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// Answers in question order (1-5; anything else counts as missing)
    #[arg(allow_negative_numbers = true)]
    pub answers: Vec<i64>,

    /// JSON file holding an array of answers
    #[arg(long, conflicts_with = "answers")]
    pub file: Option<PathBuf>,

    /// Industry used for benchmarking
    #[arg(short, long)]
    pub industry: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the configuration file path
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
