//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::splitter::QuantityPolicy;

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".taskfmt.yaml";

/// Projects value whose rows get an inverted name cell on the full sheet
pub const DEFAULT_HIGHLIGHT_PROJECT: &str = "Local Binding Shop Orders";

/// Section substring whose tasks are already finished and never classified
pub const DEFAULT_EXCLUDED_SECTION: &str = "bindings built";

pub const DEFAULT_CSV_NAME: &str = "cleaned_output.csv";
pub const DEFAULT_XLSX_NAME: &str = "cleaned_output.xlsx";

/// taskfmt configuration with layered hierarchy
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// How quantities are pulled out of task names
    pub quantity_policy: Option<QuantityPolicy>,

    /// Projects value highlighted on the full data sheet
    pub highlight_project: Option<String>,

    /// Section substring excluded from the detailed analysis
    pub excluded_section: Option<String>,

    /// Explicit column order for the full data sheet
    pub column_order: Option<Vec<String>>,

    /// Columns hidden on the full data sheet
    pub hidden_columns: Option<Vec<String>>,

    /// Columns hidden on the filtered sheet
    pub filtered_hidden_columns: Option<Vec<String>>,

    /// Default file name of the delimited export
    pub csv_name: Option<String>,

    /// Default file name of the workbook export
    pub xlsx_name: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_with(None)
    }

    /// Load configuration, using `local` instead of `./.taskfmt.yaml` when given
    pub fn load_with(local: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors below)

        // 2. Global user config (~/.config/taskfmt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./.taskfmt.yaml or --config)
        if let Some(explicit) = local {
            if !explicit.exists() {
                tracing::warn!(
                    "config file {} not found, using defaults",
                    explicit.display()
                );
            }
        }
        let local_path = local
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
        if let Some(local_config) = Self::read_file(&local_path) {
            config.merge(local_config);
        }

        // 4. Environment variables
        if let Ok(policy) = std::env::var("TASKFMT_QUANTITY_POLICY") {
            match policy.parse() {
                Ok(p) => config.quantity_policy = Some(p),
                Err(e) => tracing::warn!("ignoring TASKFMT_QUANTITY_POLICY: {}", e),
            }
        }
        if let Ok(project) = std::env::var("TASKFMT_HIGHLIGHT_PROJECT") {
            config.highlight_project = Some(project);
        }

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "taskfmt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring unreadable config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.quantity_policy.is_some() {
            self.quantity_policy = other.quantity_policy;
        }
        if other.highlight_project.is_some() {
            self.highlight_project = other.highlight_project;
        }
        if other.excluded_section.is_some() {
            self.excluded_section = other.excluded_section;
        }
        if other.column_order.is_some() {
            self.column_order = other.column_order;
        }
        if other.hidden_columns.is_some() {
            self.hidden_columns = other.hidden_columns;
        }
        if other.filtered_hidden_columns.is_some() {
            self.filtered_hidden_columns = other.filtered_hidden_columns;
        }
        if other.csv_name.is_some() {
            self.csv_name = other.csv_name;
        }
        if other.xlsx_name.is_some() {
            self.xlsx_name = other.xlsx_name;
        }
    }

    pub fn quantity_policy(&self) -> QuantityPolicy {
        self.quantity_policy.unwrap_or_default()
    }

    pub fn highlight_project(&self) -> &str {
        self.highlight_project
            .as_deref()
            .unwrap_or(DEFAULT_HIGHLIGHT_PROJECT)
    }

    pub fn excluded_section(&self) -> &str {
        self.excluded_section
            .as_deref()
            .unwrap_or(DEFAULT_EXCLUDED_SECTION)
    }

    pub fn column_order(&self) -> &[String] {
        self.column_order.as_deref().unwrap_or(&[])
    }

    pub fn hidden_columns(&self) -> &[String] {
        self.hidden_columns.as_deref().unwrap_or(&[])
    }

    /// Columns hidden on the filtered sheet (Projects and Completed At by default)
    pub fn filtered_hidden_columns(&self) -> Vec<String> {
        self.filtered_hidden_columns.clone().unwrap_or_else(|| {
            vec!["Projects".to_string(), "Completed At".to_string()]
        })
    }

    pub fn csv_name(&self) -> &str {
        self.csv_name.as_deref().unwrap_or(DEFAULT_CSV_NAME)
    }

    pub fn xlsx_name(&self) -> &str {
        self.xlsx_name.as_deref().unwrap_or(DEFAULT_XLSX_NAME)
    }
}
