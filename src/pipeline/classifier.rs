//! Size and color classification of open production tasks
//!
//! Both labels come from ordered keyword tables: the first rule whose
//! keyword appears (case-insensitive substring) in the text wins.

use serde::Serialize;

use crate::core::column::Column;
use crate::core::table::TaskTable;

/// Pad size derived from the task name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Size {
    Small,
    Medium,
    Large,
    Unknown,
}

impl Size {
    pub fn label(&self) -> &'static str {
        match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Pad color derived from the task tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Color {
    Purple,
    Black,
    Blue,
    Red,
    White,
    Green,
    Unspecified,
}

impl Color {
    pub fn label(&self) -> &'static str {
        match self {
            Color::Purple => "Purple",
            Color::Black => "Black",
            Color::Blue => "Blue",
            Color::Red => "Red",
            Color::White => "White",
            Color::Green => "Green",
            Color::Unspecified => "No Color Specified",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Size rules, checked in order
pub const SIZE_RULES: &[(&[&str], Size)] = &[
    (&["small", "sm"], Size::Small),
    (&["medium", "med"], Size::Medium),
    (&["large", "lrg"], Size::Large),
];

/// Color rules, checked in order
pub const COLOR_RULES: &[(&[&str], Color)] = &[
    (&["purple"], Color::Purple),
    (&["black"], Color::Black),
    (&["blue", "cerulean"], Color::Blue),
    (&["red", "candy red"], Color::Red),
    (&["white", "snow"], Color::White),
    (&["green"], Color::Green),
];

fn first_match<T: Copy>(text: Option<&str>, rules: &[(&[&str], T)], default: T) -> T {
    let Some(text) = text else {
        return default;
    };
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, label)| *label)
        .unwrap_or(default)
}

pub fn classify_size(name: Option<&str>) -> Size {
    first_match(name, SIZE_RULES, Size::Unknown)
}

pub fn classify_color(tags: Option<&str>) -> Color {
    first_match(tags, COLOR_RULES, Color::Unspecified)
}

/// An open task with a positive quantity, labelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedTask {
    pub section: Option<String>,
    pub name: Option<String>,
    pub quantity: i64,
    pub tags: Option<String>,
    pub size: Size,
    pub color: Color,
}

/// Label every row that passes the pre-filter.
///
/// A row is kept when its Quantity is positive and, where those columns
/// exist, it is not completed and its section does not contain
/// `excluded_section` (case-insensitive).
pub fn classify(table: &TaskTable, excluded_section: &str) -> Vec<ClassifiedTask> {
    let Some(qty_col) = table.index_of(Column::Quantity) else {
        tracing::debug!("no {} column, nothing to classify", Column::Quantity);
        return Vec::new();
    };
    let name_col = table.index_of(Column::Name);
    let tags_col = table.index_of(Column::Tags);
    let section_col = table.index_of(Column::SectionColumn);
    let completed_col = table.index_of(Column::CompletedAt);
    let excluded = excluded_section.to_lowercase();

    let text = |row: usize, col: Option<usize>| col.and_then(|c| table.text(row, c));

    (0..table.len())
        .filter_map(|row| {
            let quantity = table.integer(row, qty_col).filter(|q| *q > 0)?;
            if text(row, completed_col).is_some() {
                return None;
            }
            let section = text(row, section_col);
            if !excluded.is_empty()
                && section.is_some_and(|s| s.to_lowercase().contains(&excluded))
            {
                return None;
            }

            let name = text(row, name_col);
            let tags = text(row, tags_col);
            Some(ClassifiedTask {
                section: section.map(str::to_string),
                name: name.map(str::to_string),
                quantity,
                tags: tags.map(str::to_string),
                size: classify_size(name),
                color: classify_color(tags),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Value;

    #[test]
    fn test_size_keywords() {
        assert_eq!(classify_size(Some("Small Pad")), Size::Small);
        assert_eq!(classify_size(Some("SM pad")), Size::Small);
        assert_eq!(classify_size(Some("Med Pad")), Size::Medium);
        assert_eq!(classify_size(Some("LARGE pad")), Size::Large);
        assert_eq!(classify_size(Some("Lrg")), Size::Large);
        assert_eq!(classify_size(Some("Pad")), Size::Unknown);
        assert_eq!(classify_size(None), Size::Unknown);
    }

    #[test]
    fn test_size_priority_small_before_large() {
        assert_eq!(classify_size(Some("Large Small Pad")), Size::Small);
        assert_eq!(classify_size(Some("Large Medium Pad")), Size::Medium);
    }

    #[test]
    fn test_size_substring_match() {
        // "sm" is a substring match, not a word match
        assert_eq!(classify_size(Some("Prism Large")), Size::Small);
    }

    #[test]
    fn test_color_keywords_in_order() {
        assert_eq!(classify_color(Some("cerulean")), Color::Blue);
        assert_eq!(classify_color(Some("Candy Red, rush")), Color::Red);
        assert_eq!(classify_color(Some("snow")), Color::White);
        assert_eq!(classify_color(Some("green, black")), Color::Black);
        assert_eq!(classify_color(Some("blue, purple")), Color::Purple);
        assert_eq!(classify_color(Some("rush")), Color::Unspecified);
        assert_eq!(classify_color(None), Color::Unspecified);
        assert_eq!(Color::Unspecified.label(), "No Color Specified");
    }

    fn table(rows: Vec<Vec<Option<Value>>>) -> TaskTable {
        TaskTable::new(
            ["Section/Column", "Name", "Quantity", "Tags", "Completed At"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows,
        )
    }

    fn row(section: &str, name: &str, qty: Option<i64>, tags: &str, done: &str) -> Vec<Option<Value>> {
        let cell = |s: &str| if s.is_empty() { None } else { Some(Value::from(s)) };
        vec![cell(section), cell(name), qty.map(Value::Integer), cell(tags), cell(done)]
    }

    #[test]
    fn test_classify_prefilter() {
        let t = table(vec![
            row("Cutting", "Small Pad", Some(2), "blue", ""),
            row("Cutting", "Large Pad", Some(0), "red", ""),
            row("Cutting", "Large Pad", None, "red", ""),
            row("Cutting", "Medium Pad", Some(3), "", "2024-05-01"),
            row("Bindings Built", "Medium Pad", Some(4), "", ""),
            row("", "Lrg Pad", Some(1), "snow", ""),
        ]);
        let tasks = classify(&t, "bindings built");

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].size, Size::Small);
        assert_eq!(tasks[0].color, Color::Blue);
        assert_eq!(tasks[0].section.as_deref(), Some("Cutting"));
        assert_eq!(tasks[1].size, Size::Large);
        assert_eq!(tasks[1].color, Color::White);
        assert_eq!(tasks[1].section, None);
    }

    #[test]
    fn test_classify_without_optional_columns() {
        let t = TaskTable::new(
            vec!["Name".into(), "Quantity".into()],
            vec![vec![Some("Small".into()), Some(Value::Integer(1))]],
        );
        let tasks = classify(&t, "bindings built");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].color, Color::Unspecified);
    }

    #[test]
    fn test_classify_without_quantity_column() {
        let t = TaskTable::new(vec!["Name".into()], vec![vec![Some("Small".into())]]);
        assert!(classify(&t, "bindings built").is_empty());
    }
}
