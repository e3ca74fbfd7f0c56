//! Column normalization: section forward-fill, name/quantity split and
//! quantity column placement.

use crate::core::column::Column;
use crate::core::table::{TaskTable, Value};
use crate::pipeline::splitter::{split_name_quantity, QuantityPolicy};

/// Fill every empty section cell with the nearest preceding section.
///
/// Returns the number of cells filled. Cells before the first non-empty
/// section stay empty.
pub fn forward_fill_sections(table: &mut TaskTable) -> usize {
    let Some(col) = table.index_of(Column::SectionColumn) else {
        tracing::debug!("no {} column, skipping forward fill", Column::SectionColumn);
        return 0;
    };

    let mut last: Option<Value> = None;
    let mut filled = 0;
    for row in 0..table.len() {
        match table.text(row, col) {
            Some(section) => last = Some(Value::Text(section.to_string())),
            None => {
                if last.is_some() {
                    table.set(row, col, last.clone());
                    filled += 1;
                }
            }
        }
    }
    filled
}

/// Every row's Name as it is now, one entry per row (empty without a Name column)
pub fn name_snapshot(table: &TaskTable) -> Vec<Option<String>> {
    let Some(col) = table.index_of(Column::Name) else {
        return Vec::new();
    };
    (0..table.len())
        .map(|row| table.text(row, col).map(str::to_string))
        .collect()
}

/// Split every Name into cleaned name and Quantity.
///
/// Creates the Quantity column when missing, overwrites it otherwise.
/// Returns the number of rows where a quantity was found.
pub fn split_quantities(table: &mut TaskTable, policy: QuantityPolicy) -> usize {
    let Some(name_col) = table.index_of(Column::Name) else {
        tracing::debug!("no {} column, skipping quantity split", Column::Name);
        return 0;
    };
    let qty_col = table.ensure_column(Column::Quantity.header());

    let mut found = 0;
    for row in 0..table.len() {
        let raw = table.cell(row, name_col).map(|v| v.to_string());
        let (cleaned, quantity) = split_name_quantity(raw.as_deref(), policy);
        if quantity.is_some() {
            found += 1;
        }
        table.set(row, name_col, cleaned.map(Value::Text));
        table.set(row, qty_col, quantity.map(Value::Integer));
    }
    found
}

/// Move Quantity to sit immediately after Name
pub fn place_quantity_after_name(table: &mut TaskTable) {
    let (Some(name_col), Some(qty_col)) = (
        table.index_of(Column::Name),
        table.index_of(Column::Quantity),
    ) else {
        return;
    };

    let target = if qty_col > name_col { name_col + 1 } else { name_col };
    table.move_column(qty_col, target);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> TaskTable {
        TaskTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(|c| c.map(Value::from)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_forward_fill_uses_nearest_preceding_section() {
        let mut t = table(
            &["Section/Column", "Name"],
            vec![
                vec![None, Some("a")],
                vec![Some("Cutting"), Some("b")],
                vec![None, Some("c")],
                vec![Some("Sewing"), Some("d")],
                vec![None, Some("e")],
                vec![None, Some("f")],
            ],
        );
        let filled = forward_fill_sections(&mut t);

        assert_eq!(filled, 3);
        let sections: Vec<_> = (0..t.len()).map(|r| t.text(r, 0)).collect();
        assert_eq!(
            sections,
            vec![None, Some("Cutting"), Some("Cutting"), Some("Sewing"), Some("Sewing"), Some("Sewing")]
        );
    }

    #[test]
    fn test_forward_fill_without_column_is_noop() {
        let mut t = table(&["Name", "Tags"], vec![vec![Some("a"), None]]);
        assert_eq!(forward_fill_sections(&mut t), 0);
        assert_eq!(t.cell(0, 1), None);
    }

    #[test]
    fn test_split_quantities_creates_column() {
        let mut t = table(&["Name", "Tags"], vec![vec![Some("Large Pad 4"), None], vec![None, None]]);
        let found = split_quantities(&mut t, QuantityPolicy::Tokens);

        assert_eq!(found, 1);
        let qty = t.index_of(Column::Quantity).unwrap();
        assert_eq!(t.text(0, 0), Some("Large Pad"));
        assert_eq!(t.integer(0, qty), Some(4));
        assert_eq!(t.cell(1, 0), None);
        assert_eq!(t.cell(1, qty), None);
    }

    #[test]
    fn test_split_quantities_overwrites_existing_column() {
        let mut t = table(
            &["Quantity", "Name"],
            vec![vec![Some("99"), Some("Pad")]],
        );
        split_quantities(&mut t, QuantityPolicy::Tokens);
        assert_eq!(t.columns().len(), 2);
        assert_eq!(t.cell(0, 0), None);
    }

    #[test]
    fn test_name_snapshot_keeps_raw_names() {
        let mut t = table(&["Name"], vec![vec![Some("Large Pad 4")], vec![None]]);
        let raw = name_snapshot(&t);
        split_quantities(&mut t, QuantityPolicy::Tokens);
        assert_eq!(raw, vec![Some("Large Pad 4".to_string()), None]);
        assert!(name_snapshot(&table(&["Tags"], vec![vec![None]])).is_empty());
    }

    #[test]
    fn test_place_quantity_after_name() {
        let mut t = table(&["Section/Column", "Name", "Tags"], vec![vec![None, Some("Pad 2"), None]]);
        split_quantities(&mut t, QuantityPolicy::Tokens);
        place_quantity_after_name(&mut t);
        assert_eq!(t.columns(), &["Section/Column", "Name", "Quantity", "Tags"]);
        assert_eq!(t.integer(0, 2), Some(2));
    }

    #[test]
    fn test_place_quantity_before_name_moves_right() {
        let mut t = table(&["Quantity", "Section/Column", "Name"], vec![vec![None, None, None]]);
        place_quantity_after_name(&mut t);
        assert_eq!(t.columns(), &["Section/Column", "Name", "Quantity"]);
    }
}
