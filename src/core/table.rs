//! In-memory task table
//!
//! A [`TaskTable`] is an ordered set of named columns over a list of rows.
//! Every row holds one optional [`Value`] per column; `None` is an empty cell.
//! Pipeline stages look columns up by [`Column`] and mutate cells in place.

use serde::Serialize;

use crate::core::column::Column;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
}

impl Value {
    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Integer(_) => None,
        }
    }

    /// Integer content, if this is an integer cell
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

/// One task: a cell per table column
pub type Row = Vec<Option<Value>>;

/// Ordered column headers plus rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TaskTable {
    /// Build a table, padding or truncating rows to the column count
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a header by exact name
    pub fn position(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == header)
    }

    /// Index of a known column, accepting any of its aliases
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| column.matches(c))
    }

    pub fn has(&self, column: Column) -> bool {
        self.index_of(column).is_some()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(|v| v.as_ref())
    }

    /// Non-empty text of a cell (integers are not text)
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.cell(row, col)
            .and_then(Value::as_text)
            .filter(|s| !s.is_empty())
    }

    pub fn integer(&self, row: usize, col: usize) -> Option<i64> {
        self.cell(row, col).and_then(Value::as_integer)
    }

    pub fn set(&mut self, row: usize, col: usize, value: Option<Value>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Index of `header`, appending an empty column if it does not exist
    pub fn ensure_column(&mut self, header: &str) -> usize {
        if let Some(idx) = self.position(header) {
            return idx;
        }
        self.columns.push(header.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    /// Move the column at `from` so that it ends up at index `to`
    pub fn move_column(&mut self, from: usize, to: usize) {
        if from >= self.columns.len() || to >= self.columns.len() || from == to {
            return;
        }
        let header = self.columns.remove(from);
        self.columns.insert(to, header);
        for row in &mut self.rows {
            let cell = row.remove(from);
            row.insert(to, cell);
        }
    }

    /// Copy of the table keeping only the given columns, in the given order.
    /// Headers that do not exist are skipped.
    pub fn project(&self, headers: &[String]) -> TaskTable {
        let indices: Vec<usize> = headers.iter().filter_map(|h| self.position(h)).collect();
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        TaskTable { columns, rows }
    }

    /// Copy of the table keeping only rows for which `keep` returns true
    pub fn filter_rows<F>(&self, mut keep: F) -> TaskTable
    where
        F: FnMut(&Row) -> bool,
    {
        TaskTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Sort rows in place with a stable comparator
    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Row, &Row) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }
}
