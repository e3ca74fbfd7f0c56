//! Report assembly
//!
//! Every output sheet is described by a [`ViewDef`]: which row set it reads,
//! an optional row filter, an optional sort, a column projection and the
//! presentation rules (hidden columns, highlighted cells). Rendering a view
//! always copies; no view mutates its source or another view.

use serde::Serialize;
use std::cmp::Ordering;

use crate::core::column::Column;
use crate::core::config::Config;
use crate::core::table::{Row, TaskTable, Value};
use crate::pipeline::aggregator::SummaryRow;
use crate::pipeline::classifier::ClassifiedTask;

pub const SHEET_FORMATTED: &str = "Formatted Data";
pub const SHEET_FILTERED: &str = "Filtered View";
pub const SHEET_PIVOT: &str = "Pivot Summary";
pub const SHEET_ANALYSIS: &str = "Detailed Analysis";
pub const SHEET_SUMMARY: &str = "Summary";

/// Keywords counted by the legacy pivot, in output order
pub const PIVOT_KEYWORDS: [&str; 3] = ["small", "medium", "large"];

/// The views a report is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Full cleaned table
    Formatted,
    /// Tasks without a project, by name descending
    Filtered,
    /// Keyword totals per size over all tasks
    Pivot,
    /// Classified open tasks
    Analysis,
    /// Grouped totals over classified tasks
    Summary,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Formatted => write!(f, "formatted"),
            ViewKind::Filtered => write!(f, "filtered"),
            ViewKind::Pivot => write!(f, "pivot"),
            ViewKind::Analysis => write!(f, "analysis"),
            ViewKind::Summary => write!(f, "summary"),
        }
    }
}

/// Row set a view reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cleaned,
    LegacyPivot,
    Classified,
    Summary,
}

/// Row filter applied before sorting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// Keep rows whose column is empty (all rows if the column is missing)
    EmptyColumn(Column),
}

/// Case-insensitive sort on one column; empty cells go last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRule {
    pub column: Column,
    pub descending: bool,
}

/// Which columns a view keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Every column in source order
    All,
    /// Listed columns first (when present), the rest after in source order
    Reorder(Vec<String>),
}

/// Cells rendered inverted when another column equals a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub when: Column,
    pub equals: String,
    pub cell: Column,
}

/// Declarative description of one output sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDef {
    pub kind: ViewKind,
    pub name: &'static str,
    pub source: Source,
    pub filter: Option<RowFilter>,
    pub sort: Option<SortRule>,
    pub projection: Projection,
    pub hidden: Vec<String>,
    pub highlight: Option<Highlight>,
}

/// A rendered view, ready for export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub kind: ViewKind,
    pub name: String,
    pub table: TaskTable,
    /// Column indices hidden on export
    pub hidden: Vec<usize>,
    /// (row, column) cells rendered inverted
    pub highlighted: Vec<(usize, usize)>,
}

/// The row sets computed by the pipeline
#[derive(Debug, Clone, Copy)]
pub struct ReportSources<'a> {
    pub cleaned: &'a TaskTable,
    pub classified: &'a [ClassifiedTask],
    pub summary: &'a [SummaryRow],
}

/// All sheets of a report, in workbook order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

impl Report {
    pub fn sheet(&self, kind: ViewKind) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.kind == kind)
    }
}

/// The report layout, with presentation rules taken from config
pub fn view_definitions(config: &Config) -> Vec<ViewDef> {
    vec![
        ViewDef {
            kind: ViewKind::Formatted,
            name: SHEET_FORMATTED,
            source: Source::Cleaned,
            filter: None,
            sort: None,
            projection: Projection::Reorder(config.column_order().to_vec()),
            hidden: config.hidden_columns().to_vec(),
            highlight: Some(Highlight {
                when: Column::Projects,
                equals: config.highlight_project().to_string(),
                cell: Column::Name,
            }),
        },
        ViewDef {
            kind: ViewKind::Filtered,
            name: SHEET_FILTERED,
            source: Source::Cleaned,
            filter: Some(RowFilter::EmptyColumn(Column::Projects)),
            sort: Some(SortRule {
                column: Column::Name,
                descending: true,
            }),
            projection: Projection::All,
            hidden: config.filtered_hidden_columns(),
            highlight: None,
        },
        ViewDef {
            kind: ViewKind::Pivot,
            name: SHEET_PIVOT,
            source: Source::LegacyPivot,
            filter: None,
            sort: None,
            projection: Projection::All,
            hidden: Vec::new(),
            highlight: None,
        },
        ViewDef {
            kind: ViewKind::Analysis,
            name: SHEET_ANALYSIS,
            source: Source::Classified,
            filter: None,
            sort: None,
            projection: Projection::All,
            hidden: Vec::new(),
            highlight: None,
        },
        ViewDef {
            kind: ViewKind::Summary,
            name: SHEET_SUMMARY,
            source: Source::Summary,
            filter: None,
            sort: None,
            projection: Projection::All,
            hidden: Vec::new(),
            highlight: None,
        },
    ]
}

/// Render every view whose source is available
pub fn assemble(sources: ReportSources<'_>, config: &Config) -> Report {
    let sheets = view_definitions(config)
        .iter()
        .filter_map(|def| render_view(def, sources))
        .collect();
    Report { sheets }
}

/// Render one view; `None` when its source cannot be built
pub fn render_view(def: &ViewDef, sources: ReportSources<'_>) -> Option<Sheet> {
    let base = match def.source {
        Source::Cleaned => sources.cleaned.clone(),
        Source::LegacyPivot => legacy_pivot(sources.cleaned)?,
        Source::Classified => analysis_table(
            sources.classified,
            sources.cleaned.has(Column::SectionColumn),
        ),
        Source::Summary => summary_table(sources.summary),
    };

    let mut table = match &def.filter {
        Some(RowFilter::EmptyColumn(column)) => match base.index_of(*column) {
            Some(col) => base.filter_rows(|row| is_empty(row.get(col))),
            None => base,
        },
        None => base,
    };

    if let Some(rule) = &def.sort {
        if let Some(col) = table.index_of(rule.column) {
            table.sort_rows_by(|a, b| compare_cells(a, b, col, rule.descending));
        }
    }

    let table = match &def.projection {
        Projection::All => table,
        Projection::Reorder(order) => {
            let headers = reordered_headers(table.columns(), order);
            table.project(&headers)
        }
    };

    let hidden = def
        .hidden
        .iter()
        .filter_map(|h| table.position(h))
        .collect();

    let highlighted = def
        .highlight
        .as_ref()
        .map(|rule| highlighted_cells(&table, rule))
        .unwrap_or_default();

    Some(Sheet {
        kind: def.kind,
        name: def.name.to_string(),
        table,
        hidden,
        highlighted,
    })
}

fn is_empty(cell: Option<&Option<Value>>) -> bool {
    match cell {
        Some(Some(Value::Text(s))) => s.is_empty(),
        Some(Some(Value::Integer(_))) => false,
        _ => true,
    }
}

fn sort_key(row: &Row, col: usize) -> Option<String> {
    row.get(col)
        .and_then(|c| c.as_ref())
        .map(|v| v.to_string().to_lowercase())
        .filter(|s| !s.is_empty())
}

fn compare_cells(a: &Row, b: &Row, col: usize, descending: bool) -> Ordering {
    match (sort_key(a, col), sort_key(b, col)) {
        (Some(x), Some(y)) => {
            if descending {
                y.cmp(&x)
            } else {
                x.cmp(&y)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn reordered_headers(columns: &[String], order: &[String]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(columns.len());
    for header in order {
        if columns.contains(header) && !headers.contains(header) {
            headers.push(header.clone());
        }
    }
    for column in columns {
        if !headers.contains(column) {
            headers.push(column.clone());
        }
    }
    headers
}

fn highlighted_cells(table: &TaskTable, rule: &Highlight) -> Vec<(usize, usize)> {
    let (Some(when), Some(cell)) = (table.index_of(rule.when), table.index_of(rule.cell)) else {
        return Vec::new();
    };
    (0..table.len())
        .filter(|&row| table.text(row, when) == Some(rule.equals.as_str()))
        .map(|row| (row, cell))
        .collect()
}

/// Keyword totals per size over every row, independent of classification.
/// Totals saturate at `i64::MAX`.
///
/// `None` when there is no Name column.
pub fn legacy_pivot(table: &TaskTable) -> Option<TaskTable> {
    let name_col = table.index_of(Column::Name)?;
    let qty_col = table.index_of(Column::Quantity);

    let rows = PIVOT_KEYWORDS
        .iter()
        .map(|keyword| {
            let total: i64 = (0..table.len())
                .filter(|&row| {
                    table
                        .text(row, name_col)
                        .is_some_and(|name| name.to_lowercase().contains(keyword))
                })
                .filter_map(|row| qty_col.and_then(|q| table.integer(row, q)))
                .fold(0, i64::saturating_add);
            vec![
                Some(Value::Text(title_case(keyword))),
                Some(Value::Integer(total)),
            ]
        })
        .collect();

    Some(TaskTable::new(
        vec!["Size".to_string(), "Total Quantity".to_string()],
        rows,
    ))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Classified tasks as a table
pub fn analysis_table(tasks: &[ClassifiedTask], with_section: bool) -> TaskTable {
    let mut columns = Vec::new();
    if with_section {
        columns.push(Column::SectionColumn.header().to_string());
    }
    columns.extend(
        [
            Column::Name.header(),
            Column::Quantity.header(),
            Column::Tags.header(),
            "Size",
            "Color",
        ]
        .iter()
        .map(|c| c.to_string()),
    );

    let rows = tasks
        .iter()
        .map(|task| {
            let mut row: Row = Vec::with_capacity(columns.len());
            if with_section {
                row.push(task.section.clone().map(Value::Text));
            }
            row.push(task.name.clone().map(Value::Text));
            row.push(Some(Value::Integer(task.quantity)));
            row.push(task.tags.clone().map(Value::Text));
            row.push(Some(Value::from(task.size.label())));
            row.push(Some(Value::from(task.color.label())));
            row
        })
        .collect();

    TaskTable::new(columns, rows)
}

/// Summary rows as a table
pub fn summary_table(rows: &[SummaryRow]) -> TaskTable {
    TaskTable::new(
        vec![
            "Category".to_string(),
            "Subcategory".to_string(),
            "Quantity".to_string(),
        ],
        rows.iter()
            .map(|r| {
                vec![
                    Some(Value::Text(r.category.clone())),
                    Some(Value::Text(r.subcategory.clone())),
                    Some(Value::Integer(r.quantity)),
                ]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classifier::{Color, Size};

    fn cleaned() -> TaskTable {
        let text = |s: &str| Some(Value::from(s));
        TaskTable::new(
            vec![
                "Section/Column".into(),
                "Name".into(),
                "Quantity".into(),
                "Projects".into(),
            ],
            vec![
                vec![text("Cutting"), text("alpha Small"), Some(Value::Integer(2)), None],
                vec![text("Cutting"), text("Beta large"), Some(Value::Integer(5)), text("Local Binding Shop Orders")],
                vec![text("Sewing"), None, Some(Value::Integer(9)), None],
                vec![text("Sewing"), text("gamma medium"), None, None],
                vec![text("Sewing"), text("Delta Small"), Some(Value::Integer(3)), None],
            ],
        )
    }

    fn sources<'a>(
        table: &'a TaskTable,
        classified: &'a [ClassifiedTask],
        summary: &'a [SummaryRow],
    ) -> ReportSources<'a> {
        ReportSources {
            cleaned: table,
            classified,
            summary,
        }
    }

    fn names(sheet: &Sheet) -> Vec<Option<&str>> {
        let col = sheet.table.position("Name").unwrap();
        (0..sheet.table.len()).map(|r| sheet.table.text(r, col)).collect()
    }

    #[test]
    fn test_default_report_has_all_sheets_in_order() {
        let table = cleaned();
        let report = assemble(sources(&table, &[], &[]), &Config::default());
        let order: Vec<_> = report.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            order,
            vec![SHEET_FORMATTED, SHEET_FILTERED, SHEET_PIVOT, SHEET_ANALYSIS, SHEET_SUMMARY]
        );
    }

    #[test]
    fn test_filtered_view_drops_projects_and_sorts_descending() {
        let table = cleaned();
        let report = assemble(sources(&table, &[], &[]), &Config::default());
        let sheet = report.sheet(ViewKind::Filtered).unwrap();

        assert_eq!(
            names(sheet),
            vec![Some("gamma medium"), Some("Delta Small"), Some("alpha Small"), None]
        );
        assert_eq!(sheet.hidden, vec![3]);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_formatted_view_highlights_shop_orders() {
        let table = cleaned();
        let report = assemble(sources(&table, &[], &[]), &Config::default());
        let sheet = report.sheet(ViewKind::Formatted).unwrap();
        assert_eq!(sheet.highlighted, vec![(1, 1)]);
        assert!(sheet.hidden.is_empty());
    }

    #[test]
    fn test_formatted_view_reorders_and_hides() {
        let table = cleaned();
        let config = Config {
            column_order: Some(vec!["Projects".into(), "Nope".into(), "Name".into()]),
            hidden_columns: Some(vec!["Section/Column".into()]),
            ..Default::default()
        };
        let report = assemble(sources(&table, &[], &[]), &config);
        let sheet = report.sheet(ViewKind::Formatted).unwrap();

        assert_eq!(
            sheet.table.columns(),
            &["Projects", "Name", "Section/Column", "Quantity"]
        );
        assert_eq!(sheet.hidden, vec![2]);
        assert_eq!(sheet.highlighted, vec![(1, 1)]);
    }

    #[test]
    fn test_legacy_pivot_counts_all_rows() {
        let table = cleaned();
        let pivot = legacy_pivot(&table).unwrap();
        assert_eq!(pivot.columns(), &["Size", "Total Quantity"]);
        let totals: Vec<_> = (0..pivot.len())
            .map(|r| (pivot.text(r, 0).unwrap(), pivot.integer(r, 1).unwrap()))
            .collect();
        assert_eq!(totals, vec![("Small", 5), ("Medium", 0), ("Large", 5)]);
    }

    #[test]
    fn test_legacy_pivot_totals_saturate() {
        let table = TaskTable::new(
            vec!["Name".into(), "Quantity".into()],
            vec![
                vec![Some("Large Pad".into()), Some(Value::Integer(i64::MAX))],
                vec![Some("Large Cover".into()), Some(Value::Integer(1))],
            ],
        );
        let pivot = legacy_pivot(&table).unwrap();
        assert_eq!(pivot.integer(2, 1), Some(i64::MAX));
        assert_eq!(pivot.integer(0, 1), Some(0));
    }

    #[test]
    fn test_legacy_pivot_needs_name_column() {
        let table = TaskTable::new(vec!["Tags".into(), "Notes".into()], vec![]);
        assert!(legacy_pivot(&table).is_none());
        let report = assemble(sources(&table, &[], &[]), &Config::default());
        assert!(report.sheet(ViewKind::Pivot).is_none());
    }

    #[test]
    fn test_analysis_and_summary_tables() {
        let table = cleaned();
        let classified = vec![ClassifiedTask {
            section: Some("Cutting".into()),
            name: Some("alpha Small".into()),
            quantity: 2,
            tags: Some("blue".into()),
            size: Size::Small,
            color: Color::Blue,
        }];
        let summary = crate::pipeline::aggregator::summarize(&classified);
        let report = assemble(sources(&table, &classified, &summary), &Config::default());

        let analysis = &report.sheet(ViewKind::Analysis).unwrap().table;
        assert_eq!(
            analysis.columns(),
            &["Section/Column", "Name", "Quantity", "Tags", "Size", "Color"]
        );
        assert_eq!(analysis.text(0, 5), Some("Blue"));

        let summary_sheet = &report.sheet(ViewKind::Summary).unwrap().table;
        assert_eq!(summary_sheet.columns(), &["Category", "Subcategory", "Quantity"]);
        assert_eq!(summary_sheet.len(), 3);
        assert_eq!(summary_sheet.text(2, 1), Some("Cutting - Small"));
    }

    #[test]
    fn test_analysis_without_section_column() {
        let table = analysis_table(&[], false);
        assert_eq!(table.columns(), &["Name", "Quantity", "Tags", "Size", "Color"]);
    }
}
