//! Export of computed tables: delimited text and multi-sheet workbook

pub mod delimited;
pub mod workbook;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub use delimited::{write_csv, write_delimited};
pub use workbook::{write_workbook, WorkbookWriter};

/// Errors raised while writing output files
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("Cannot write {path}: {source}")]
    #[diagnostic(code(taskfmt::export::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    #[diagnostic(code(taskfmt::export::csv))]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    #[diagnostic(
        code(taskfmt::export::xlsx),
        help("Sheet names must be unique and at most 31 characters")
    )]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}
