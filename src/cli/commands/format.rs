//! `taskfmt format` command - Clean an export and write CSV + workbook

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_and_run, output_path, pipeline_options};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::export::{write_csv, write_workbook};
use crate::pipeline::QuantityPolicy;

#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Task export CSV to clean
    pub input: PathBuf,

    /// Directory for output files (default: current directory)
    #[arg(long, short = 'o', default_value = ".")]
    pub out_dir: PathBuf,

    /// Path of the cleaned CSV (overrides --out-dir and csv_name)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Path of the workbook (overrides --out-dir and xlsx_name)
    #[arg(long)]
    pub xlsx: Option<PathBuf>,

    /// Do not write the cleaned CSV
    #[arg(long)]
    pub no_csv: bool,

    /// Do not write the workbook
    #[arg(long)]
    pub no_xlsx: bool,

    /// How quantities are read from task names
    #[arg(long, value_enum)]
    pub quantity_policy: Option<QuantityPolicy>,

    /// Run the pipeline and report without writing files
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: FormatArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_with(global.config.as_deref());
    let options = pipeline_options(&config, args.quantity_policy);

    if !global.quiet {
        println!(
            "{} Formatting {}{}",
            style("→").blue(),
            style(args.input.display()).yellow(),
            if args.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
    }

    let output = load_and_run(&args.input, &options)?;
    let report = output.report(&config);

    let mut written = Vec::new();
    if !args.dry_run {
        if !args.out_dir.exists() {
            std::fs::create_dir_all(&args.out_dir).map_err(|e| {
                miette::miette!("Cannot create {}: {}", args.out_dir.display(), e)
            })?;
        }

        if !args.no_csv {
            let path = output_path(args.csv.clone(), &args.out_dir, config.csv_name());
            write_csv(&output.cleaned, &path)?;
            written.push(path);
        }
        if !args.no_xlsx {
            let path = output_path(args.xlsx.clone(), &args.out_dir, config.xlsx_name());
            write_workbook(&report, &path)?;
            written.push(path);
        }
    }

    if global.quiet {
        return Ok(());
    }

    let stats = output.stats;
    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Format Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows processed:     {}", style(stats.rows).cyan());
    println!("  Quantities found:   {}", style(stats.quantities_found).cyan());
    println!(
        "  Sections filled:    {}",
        style(stats.sections_filled).cyan()
    );
    println!(
        "  Rows inheriting:    {}",
        style(stats.inheritance.rows_resolved).green()
    );
    if stats.inheritance.unresolved > 0 {
        println!(
            "  Unknown parents:    {}",
            style(stats.inheritance.unresolved).yellow()
        );
    }
    if stats.inheritance.cycles > 0 {
        println!(
            "  Parent cycles:      {}",
            style(stats.inheritance.cycles).red()
        );
    }
    println!("  Open tasks sized:   {}", style(stats.classified).cyan());
    println!("  Sheets:             {}", style(report.sheets.len()).cyan());

    if args.dry_run {
        println!();
        println!(
            "{}",
            style("Dry run complete. No files were written.").yellow()
        );
    } else {
        println!();
        for path in &written {
            println!("{} Wrote {}", style("✓").green(), style(path.display()).cyan());
        }
    }

    Ok(())
}
