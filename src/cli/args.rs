//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, format::FormatArgs,
    preview::PreviewArgs,
};

#[derive(Parser)]
#[command(name = "taskfmt")]
#[command(author, version, about = "Task export formatter")]
#[command(long_about = "Turns a task-export CSV into a cleaned, enriched, multi-sheet production workbook.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format for printed tables
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file to use instead of ./.taskfmt.yaml
    #[arg(long, global = true, env = "TASKFMT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a task export and write the CSV and workbook outputs
    Format(FormatArgs),

    /// Print one report view to stdout
    Preview(PreviewArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bordered table for terminals
    #[default]
    Auto,
    /// JSON array of row objects
    Json,
    /// YAML list of row mappings
    Yaml,
    /// Comma-separated values
    Csv,
    /// Tab-separated values (for piping)
    Tsv,
    /// Markdown table
    Md,
}
