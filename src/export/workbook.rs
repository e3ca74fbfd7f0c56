//! Multi-sheet workbook export
//!
//! Every [`Sheet`] of a [`Report`] becomes one worksheet:
//! - bold, centered header row
//! - integers written as numbers, text as strings, empty cells skipped
//!   (xlsx numbers are doubles, so integers above 2^53 lose precision)
//! - column width = longest rendered cell (header included) + 2
//! - hidden columns hidden, not dropped
//! - highlighted cells rendered white-on-black

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::path::Path;

use crate::core::table::{TaskTable, Value};
use crate::export::ExportError;
use crate::pipeline::report::{Report, Sheet};

/// Extra characters added to the widest cell of each column
const WIDTH_PADDING: usize = 2;

/// Renders reports into xlsx workbooks
#[derive(Clone, Debug)]
pub struct WorkbookWriter {
    header: Format,
    highlight: Format,
}

impl Default for WorkbookWriter {
    fn default() -> Self {
        Self {
            header: Format::new().set_bold().set_align(FormatAlign::Center),
            highlight: Format::new()
                .set_bold()
                .set_font_color(0xFFFFFF)
                .set_background_color(0x000000),
        }
    }
}

impl WorkbookWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the workbook in memory
    pub fn render(&self, report: &Report) -> Result<Workbook, ExportError> {
        let mut workbook = Workbook::new();
        for sheet in &report.sheets {
            let worksheet = workbook.add_worksheet();
            self.fill_sheet(worksheet, sheet)?;
        }
        Ok(workbook)
    }

    /// Render and serialize to xlsx bytes
    pub fn to_buffer(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        let mut workbook = self.render(report)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Render and save to `path`
    pub fn save(&self, report: &Report, path: &Path) -> Result<(), ExportError> {
        let mut workbook = self.render(report)?;
        workbook.save(path)?;
        Ok(())
    }

    fn fill_sheet(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), ExportError> {
        worksheet.set_name(&sheet.name)?;
        let table = &sheet.table;

        for (col, header) in table.columns().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &self.header)?;
        }

        for (row_idx, row) in table.rows().iter().enumerate() {
            let xl_row = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let Some(value) = cell else {
                    continue;
                };
                let xl_col = col_idx as u16;
                let highlighted = sheet.highlighted.contains(&(row_idx, col_idx));
                match (value, highlighted) {
                    (Value::Text(s), false) => {
                        worksheet.write_string(xl_row, xl_col, s)?;
                    }
                    (Value::Text(s), true) => {
                        worksheet.write_string_with_format(xl_row, xl_col, s, &self.highlight)?;
                    }
                    (Value::Integer(n), false) => {
                        worksheet.write_number(xl_row, xl_col, *n as f64)?;
                    }
                    (Value::Integer(n), true) => {
                        worksheet.write_number_with_format(
                            xl_row,
                            xl_col,
                            *n as f64,
                            &self.highlight,
                        )?;
                    }
                }
            }
        }

        for (col, width) in column_widths(table).into_iter().enumerate() {
            worksheet.set_column_width(col as u16, width as f64)?;
        }
        for &col in &sheet.hidden {
            worksheet.set_column_hidden(col as u16)?;
        }

        Ok(())
    }
}

/// Save `report` as an xlsx workbook with default styling
pub fn write_workbook(report: &Report, path: &Path) -> Result<(), ExportError> {
    WorkbookWriter::new().save(report, path)
}

/// Fitted width of every column, in characters
pub fn column_widths(table: &TaskTable) -> Vec<usize> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest = table
                .rows()
                .iter()
                .filter_map(|row| row.get(col).and_then(|c| c.as_ref()))
                .map(|v| v.to_string().chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            longest + WIDTH_PADDING
        })
        .collect()
}
