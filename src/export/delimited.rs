//! Delimited-text export of a table

use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::table::TaskTable;
use crate::export::ExportError;

/// Write `table` as CSV to `path`: header row, no index, empty cells blank
pub fn write_csv(table: &TaskTable, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_delimited(table, BufWriter::new(file), b',')
}

/// Write `table` to any writer with the given delimiter
pub fn write_delimited<W: Write>(
    table: &TaskTable,
    writer: W,
    delimiter: u8,
) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(
            row.iter()
                .map(|cell| cell.as_ref().map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
