//! Core module - table model, loading and configuration

pub mod column;
pub mod config;
pub mod loader;
pub mod table;

pub use column::Column;
pub use config::Config;
pub use loader::{load_csv, read_table, LoadError};
pub use table::{Row, TaskTable, Value};
