//! Terminal rendering of report sheets
//!
//! One [`Sheet`] can be printed in every [`OutputFormat`]:
//! - Auto and Md go through `tabled` (one line per row, long cells truncated)
//! - Csv and Tsv reuse the delimited exporter
//! - Json and Yaml emit one mapping per row, keys in column order

use miette::{IntoDiagnostic, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{single_line, truncate_str};
use crate::cli::OutputFormat;
use crate::core::table::{TaskTable, Value};
use crate::export::write_delimited;
use crate::pipeline::report::Sheet;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Print at most this many rows
    pub limit: Option<usize>,
    /// Keep columns the sheet hides on export
    pub include_hidden: bool,
    /// Maximum cell width in terminal tables before truncation
    pub max_cell_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            limit: None,
            include_hidden: false,
            max_cell_width: 40,
        }
    }
}

/// The part of a sheet that gets printed
pub fn visible_table(sheet: &Sheet, config: &TableConfig) -> TaskTable {
    let headers: Vec<String> = sheet
        .table
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| config.include_hidden || !sheet.hidden.contains(i))
        .map(|(_, h)| h.clone())
        .collect();
    let projected = sheet.table.project(&headers);

    match config.limit {
        Some(limit) if limit < projected.len() => {
            let mut seen = 0;
            projected.filter_rows(|_| {
                seen += 1;
                seen <= limit
            })
        }
        _ => projected,
    }
}

/// Render a sheet as text in the requested format
pub fn render_sheet(sheet: &Sheet, format: OutputFormat, config: &TableConfig) -> Result<String> {
    let table = visible_table(sheet, config);

    match format {
        OutputFormat::Auto => Ok(render_tabled(&table, false, config.max_cell_width)),
        OutputFormat::Md => Ok(render_tabled(&table, true, usize::MAX)),
        OutputFormat::Csv => render_delimited(&table, b','),
        OutputFormat::Tsv => render_delimited(&table, b'\t'),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&records(&table)).into_diagnostic()?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => serde_yml::to_string(&records(&table)).into_diagnostic(),
    }
}

fn render_tabled(table: &TaskTable, markdown: bool, max_width: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns().iter().cloned());
    for row in table.rows() {
        builder.push_record(row.iter().map(|cell| {
            let text = cell.as_ref().map(|v| single_line(&v.to_string())).unwrap_or_default();
            // Escape pipe characters for markdown tables
            let text = if markdown { text.replace('|', "\\|") } else { text };
            truncate_str(&text, max_width)
        }));
    }

    let mut built = builder.build();
    if markdown {
        built.with(Style::markdown());
    } else {
        built.with(Style::rounded());
    }
    let mut out = built.to_string();
    out.push('\n');
    out
}

fn render_delimited(table: &TaskTable, delimiter: u8) -> Result<String> {
    let mut buf = Vec::new();
    write_delimited(table, &mut buf, delimiter)?;
    String::from_utf8(buf).into_diagnostic()
}

/// One row as an ordered mapping of column to value
struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Option<Value>],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

fn records(table: &TaskTable) -> Vec<Record<'_>> {
    table
        .rows()
        .iter()
        .map(|row| Record {
            columns: table.columns(),
            cells: row,
        })
        .collect()
}
