//! taskfmt: task export formatter
//!
//! Cleans a task-management CSV export, inherits tags and notes down parent
//! chains, sizes and colors open work, and writes a CSV plus a multi-sheet
//! workbook.

pub mod cli;
pub mod core;
pub mod export;
pub mod pipeline;
