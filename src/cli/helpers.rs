//! Shared helper functions for CLI commands

use miette::Result;
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::loader::load_csv;
use crate::pipeline::{self, PipelineOptions, PipelineOutput};

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Counts characters, not bytes, so multi-byte names never split.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Collapse a multi-line cell into one line for terminal tables
pub fn single_line(s: &str) -> String {
    s.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" / ")
}

/// Resolve an output file: explicit path, else `name` inside `dir`
pub fn output_path(explicit: Option<PathBuf>, dir: &Path, name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| dir.join(name))
}

/// Load an export and run the pipeline over it
pub fn load_and_run(input: &Path, options: &PipelineOptions) -> Result<PipelineOutput> {
    if !input.exists() {
        return Err(miette::miette!("File not found: {}", input.display()));
    }
    let table = load_csv(input)?;
    if table.is_empty() {
        tracing::warn!("{} has a header but no task rows", input.display());
    }
    Ok(pipeline::run(table, options))
}

/// Pipeline options from config, with an optional command-line override
pub fn pipeline_options(
    config: &Config,
    policy: Option<pipeline::QuantityPolicy>,
) -> PipelineOptions {
    let mut options = PipelineOptions::from_config(config);
    if let Some(policy) = policy {
        options.quantity_policy = policy;
    }
    options
}
