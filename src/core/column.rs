//! Known task-export columns
//!
//! Task exports carry many columns; only a handful drive the pipeline. Each
//! known column has a canonical header plus the aliases seen in real exports.

/// Columns the pipeline reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SectionColumn,
    Name,
    Quantity,
    ParentTask,
    Tags,
    Notes,
    Projects,
    CompletedAt,
}

impl Column {
    /// Canonical header used when the column is created or exported
    pub fn header(&self) -> &'static str {
        match self {
            Column::SectionColumn => "Section/Column",
            Column::Name => "Name",
            Column::Quantity => "Quantity",
            Column::ParentTask => "Parent task",
            Column::Tags => "Tags",
            Column::Notes => "Notes",
            Column::Projects => "Projects",
            Column::CompletedAt => "Completed At",
        }
    }

    /// Headers accepted as this column (exact match)
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::SectionColumn => &["Section/Column"],
            Column::Name => &["Name"],
            Column::Quantity => &["Quantity"],
            Column::ParentTask => &["Parent task", "Parent Task"],
            Column::Tags => &["Tags"],
            Column::Notes => &["Notes"],
            Column::Projects => &["Projects"],
            Column::CompletedAt => &["Completed At"],
        }
    }

    /// Whether a header names this column
    pub fn matches(&self, header: &str) -> bool {
        self.aliases().iter().any(|alias| *alias == header)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}
