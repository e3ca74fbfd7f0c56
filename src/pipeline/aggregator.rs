//! Grouped quantity totals over classified tasks

use serde::Serialize;
use std::collections::BTreeMap;

use crate::pipeline::classifier::ClassifiedTask;

pub const CATEGORY_SIZE: &str = "Size";
pub const CATEGORY_SIZE_COLOR: &str = "Size & Color";
pub const CATEGORY_SECTION_SIZE: &str = "Section & Size";

/// One line of the summary sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub category: String,
    pub subcategory: String,
    pub quantity: i64,
}

/// Sum quantities per key; keys come out in ascending label order.
/// Totals saturate at `i64::MAX`.
fn group_sum<F>(tasks: &[ClassifiedTask], category: &str, mut key: F) -> Vec<SummaryRow>
where
    F: FnMut(&ClassifiedTask) -> Option<String>,
{
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for task in tasks {
        if let Some(k) = key(task) {
            let total = totals.entry(k).or_insert(0);
            *total = total.saturating_add(task.quantity);
        }
    }
    totals
        .into_iter()
        .map(|(subcategory, quantity)| SummaryRow {
            category: category.to_string(),
            subcategory,
            quantity,
        })
        .collect()
}

/// Totals per size
pub fn by_size(tasks: &[ClassifiedTask]) -> Vec<SummaryRow> {
    group_sum(tasks, CATEGORY_SIZE, |t| Some(t.size.to_string()))
}

/// Totals per size and color, labelled `"{Size} - {Color}"`
pub fn by_size_and_color(tasks: &[ClassifiedTask]) -> Vec<SummaryRow> {
    group_sum(tasks, CATEGORY_SIZE_COLOR, |t| {
        Some(format!("{} - {}", t.size, t.color))
    })
}

/// Totals per section and size, labelled `"{Section} - {Size}"`.
/// Tasks without a section are left out.
pub fn by_section_and_size(tasks: &[ClassifiedTask]) -> Vec<SummaryRow> {
    group_sum(tasks, CATEGORY_SECTION_SIZE, |t| {
        t.section
            .as_ref()
            .map(|section| format!("{} - {}", section, t.size))
    })
}

/// All three groupings, concatenated in that order
pub fn summarize(tasks: &[ClassifiedTask]) -> Vec<SummaryRow> {
    let mut rows = by_size(tasks);
    rows.extend(by_size_and_color(tasks));
    rows.extend(by_section_and_size(tasks));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classifier::{Color, Size};

    fn task(section: Option<&str>, size: Size, color: Color, quantity: i64) -> ClassifiedTask {
        ClassifiedTask {
            section: section.map(str::to_string),
            name: None,
            quantity,
            tags: None,
            size,
            color,
        }
    }

    fn pairs(rows: &[SummaryRow]) -> Vec<(&str, i64)> {
        rows.iter().map(|r| (r.subcategory.as_str(), r.quantity)).collect()
    }

    #[test]
    fn test_by_size_sums_quantities() {
        let tasks = vec![
            task(None, Size::Small, Color::Red, 2),
            task(None, Size::Small, Color::Red, 3),
            task(None, Size::Large, Color::Red, 1),
        ];
        let rows = by_size(&tasks);
        assert_eq!(pairs(&rows), vec![("Large", 1), ("Small", 5)]);
        assert!(rows.iter().all(|r| r.category == CATEGORY_SIZE));
    }

    #[test]
    fn test_by_size_and_color_labels() {
        let tasks = vec![
            task(None, Size::Medium, Color::Unspecified, 4),
            task(None, Size::Medium, Color::Blue, 1),
            task(None, Size::Medium, Color::Blue, 1),
        ];
        assert_eq!(
            pairs(&by_size_and_color(&tasks)),
            vec![("Medium - Blue", 2), ("Medium - No Color Specified", 4)]
        );
    }

    #[test]
    fn test_by_section_skips_missing_section() {
        let tasks = vec![
            task(Some("Cutting"), Size::Small, Color::Red, 2),
            task(None, Size::Small, Color::Red, 7),
            task(Some("Cutting"), Size::Small, Color::Blue, 1),
        ];
        assert_eq!(pairs(&by_section_and_size(&tasks)), vec![("Cutting - Small", 3)]);
    }

    #[test]
    fn test_summarize_preserves_category_order() {
        let tasks = vec![task(Some("Sewing"), Size::Large, Color::Green, 6)];
        let rows = summarize(&tasks);
        let categories: Vec<_> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(
            categories,
            vec![CATEGORY_SIZE, CATEGORY_SIZE_COLOR, CATEGORY_SECTION_SIZE]
        );
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let tasks = vec![
            task(Some("Cutting"), Size::Small, Color::Red, i64::MAX),
            task(Some("Cutting"), Size::Small, Color::Red, 1),
        ];
        let rows = summarize(&tasks);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.quantity == i64::MAX));
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_empty());
    }
}
