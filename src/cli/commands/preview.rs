//! `taskfmt preview` command - Print one report view

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_and_run, pipeline_options};
use crate::cli::table::{render_sheet, TableConfig};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::pipeline::{QuantityPolicy, ViewKind};

#[derive(clap::Args, Debug)]
pub struct PreviewArgs {
    /// Task export CSV to read
    pub input: PathBuf,

    /// Which sheet to print
    #[arg(long, value_enum, default_value = "formatted")]
    pub view: ViewKind,

    /// Print at most N rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Include columns the sheet hides
    #[arg(long)]
    pub all_columns: bool,

    /// How quantities are read from task names
    #[arg(long, value_enum)]
    pub quantity_policy: Option<QuantityPolicy>,
}

pub fn run(args: PreviewArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_with(global.config.as_deref());
    let options = pipeline_options(&config, args.quantity_policy);
    let output = load_and_run(&args.input, &options)?;
    let report = output.report(&config);

    let sheet = report.sheet(args.view).ok_or_else(|| {
        miette::miette!(
            "View '{}' is not available for {} (the pivot view needs a Name column)",
            args.view,
            args.input.display()
        )
    })?;

    let table_config = TableConfig {
        limit: args.limit,
        include_hidden: args.all_columns,
        ..Default::default()
    };
    print!("{}", render_sheet(sheet, global.format, &table_config)?);

    Ok(())
}
