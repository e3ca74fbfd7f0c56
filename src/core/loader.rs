//! Task export loading
//!
//! Reads a CSV export into a [`TaskTable`]. The export's first column is a
//! task identifier the production sheets never use, so it is dropped here.

use csv::ReaderBuilder;
use miette::Diagnostic;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::table::{Row, TaskTable, Value};

/// Errors that make an export unusable
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Cannot open {path}: {source}")]
    #[diagnostic(code(taskfmt::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at row {row}: {source}")]
    #[diagnostic(code(taskfmt::load::csv))]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Input has no header row")]
    #[diagnostic(
        code(taskfmt::load::empty),
        help("Export the tasks again; the file appears to be empty")
    )]
    Empty,

    #[error("Input has {found} column(s); at least 2 are required")]
    #[diagnostic(
        code(taskfmt::load::columns),
        help("The first column is always discarded, so a task export needs at least one more")
    )]
    TooFewColumns { found: usize },
}

/// Load a task export from a CSV file
pub fn load_csv(path: &Path) -> Result<TaskTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(BufReader::new(file))
}

/// Parse a task export from any reader
pub fn read_table<R: Read>(reader: R) -> Result<TaskTable, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| LoadError::Csv { row: 1, source })?
        .clone();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Empty);
    }
    if headers.len() < 2 {
        return Err(LoadError::TooFewColumns {
            found: headers.len(),
        });
    }

    let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = row_idx + 2; // +2 for 1-indexed and header row
        let record = result.map_err(|source| LoadError::Csv {
            row: row_num,
            source,
        })?;

        let row: Row = record
            .iter()
            .skip(1)
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(Value::Text(field.to_string()))
                }
            })
            .collect();
        rows.push(row);
    }

    tracing::debug!(columns = columns.len(), rows = rows.len(), "loaded task export");
    Ok(TaskTable::new(columns, rows))
}
