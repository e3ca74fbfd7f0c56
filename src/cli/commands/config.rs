//! `taskfmt config` command - Configuration management
//!
//! Provides commands to view and modify taskfmt configuration.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::config::LOCAL_CONFIG_FILE;
use crate::core::Config;
use crate::pipeline::QuantityPolicy;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only the local config file
    #[arg(long = "local-only")]
    pub local_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., quantity_policy, hidden_columns)
    pub key: String,

    /// Value to set (comma-separated for list keys)
    pub value: String,

    /// Set in global (user) config instead of the local file
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of the local file
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only the local config path
    #[arg(long = "local-only")]
    pub local_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    (
        "quantity_policy",
        "How quantities are read from names (tokens, multiplier)",
    ),
    (
        "highlight_project",
        "Projects value whose names are highlighted",
    ),
    (
        "excluded_section",
        "Section text whose tasks are left out of the analysis",
    ),
    ("column_order", "Column order of the formatted sheet"),
    ("hidden_columns", "Columns hidden on the formatted sheet"),
    (
        "filtered_hidden_columns",
        "Columns hidden on the filtered sheet",
    ),
    ("csv_name", "File name of the cleaned CSV"),
    ("xlsx_name", "File name of the workbook"),
];

/// Keys holding a list of column names
const LIST_KEYS: &[&str] = &["column_order", "hidden_columns", "filtered_hidden_columns"];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let local = local_config_path(global);
    match cmd {
        ConfigCommands::Show(args) => run_show(args, &local, global),
        ConfigCommands::Set(args) => run_set(args, &local),
        ConfigCommands::Unset(args) => run_unset(args, &local),
        ConfigCommands::Path(args) => run_path(args, &local),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, local: &Path, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_with(global.config.as_deref());

    // If a specific key is requested, show just that value
    if let Some(key) = &args.key {
        check_key(key)?;
        println!("{}", get_config_value(&config, key));
        return Ok(());
    }

    if args.local_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --local-only and --global-only"
        ));
    }

    if args.local_only {
        show_config_file("Local config:", local)?;
    } else if args.global_only {
        show_config_file("Global config:", &get_global_config_path()?)?;
    } else {
        // Show merged/effective config
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();

        for (key, _) in VALID_KEYS {
            println!(
                "  {}: {}",
                style(key).cyan(),
                style(get_config_value(&config, key)).yellow()
            );
        }

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (TASKFMT_QUANTITY_POLICY, TASKFMT_HIGHLIGHT_PROJECT)");
        println!("  2. Local config ({})", local.display());
        println!("  3. Global config (~/.config/taskfmt/config.yaml)");
    }

    Ok(())
}

fn run_set(args: SetArgs, local: &Path) -> Result<()> {
    check_key(&args.key)?;
    let config_path = if args.global {
        get_global_config_path()?
    } else {
        local.to_path_buf()
    };

    let mut config_map = read_mapping(&config_path)?;
    let value = parse_value(&args.key, &args.value)?;

    if let serde_yml::Value::Mapping(map) = &mut config_map {
        map.insert(serde_yml::Value::String(args.key.clone()), value);
    }

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "local" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );

    Ok(())
}

fn run_unset(args: UnsetArgs, local: &Path) -> Result<()> {
    check_key(&args.key)?;
    let config_path = if args.global {
        get_global_config_path()?
    } else {
        local.to_path_buf()
    };

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = match &mut config_map {
        serde_yml::Value::Mapping(map) => map
            .remove(serde_yml::Value::String(args.key.clone()))
            .is_some(),
        _ => false,
    };

    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "local" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );

    Ok(())
}

fn run_path(args: PathArgs, local: &Path) -> Result<()> {
    if args.local_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --local-only and --global-only"
        ));
    }

    if args.local_only {
        println!("{}", local.display());
    } else if args.global_only {
        println!("{}", get_global_config_path()?.display());
    } else {
        println!("{}", style("Configuration file paths:").bold());
        println!();
        if let Ok(global_path) = get_global_config_path() {
            print_path("Global:", &global_path);
            println!();
        }
        print_path("Local: ", local);
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<24} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'taskfmt config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn local_config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
}

fn get_global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            "Unknown configuration key '{}'. Run 'taskfmt config keys' to list valid keys",
            key
        ))
    }
}

/// Turn a command-line value into the YAML stored for `key`
fn parse_value(key: &str, raw: &str) -> Result<serde_yml::Value> {
    if key == "quantity_policy" {
        let policy: QuantityPolicy = raw.parse().map_err(|e| miette::miette!("{}", e))?;
        return Ok(serde_yml::Value::String(policy.to_string()));
    }
    if LIST_KEYS.contains(&key) {
        let items = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| serde_yml::Value::String(s.to_string()))
            .collect();
        return Ok(serde_yml::Value::Sequence(items));
    }
    Ok(serde_yml::Value::String(raw.to_string()))
}

fn read_mapping(path: &Path) -> Result<serde_yml::Value> {
    if !path.exists() {
        return Ok(serde_yml::Value::Mapping(Default::default()));
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    let parsed: serde_yml::Value =
        serde_yml::from_str(&content).unwrap_or(serde_yml::Value::Mapping(Default::default()));
    // An empty or non-mapping file starts over
    if parsed.is_mapping() {
        Ok(parsed)
    } else {
        Ok(serde_yml::Value::Mapping(Default::default()))
    }
}

fn get_config_value(config: &Config, key: &str) -> String {
    match key {
        "quantity_policy" => config.quantity_policy().to_string(),
        "highlight_project" => config.highlight_project().to_string(),
        "excluded_section" => config.excluded_section().to_string(),
        "column_order" => list_display(config.column_order()),
        "hidden_columns" => list_display(config.hidden_columns()),
        "filtered_hidden_columns" => list_display(&config.filtered_hidden_columns()),
        "csv_name" => config.csv_name().to_string(),
        "xlsx_name" => config.xlsx_name().to_string(),
        _ => String::new(),
    }
}

fn list_display(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("          {}", style("(exists)").green());
    } else {
        println!("          {}", style("(not created)").dim());
    }
}

fn show_config_file(title: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }

    Ok(())
}
