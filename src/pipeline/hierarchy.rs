//! Tag and note inheritance along parent-task chains
//!
//! A subtask inherits the tags and notes of every task above it. For a task
//! whose parent is `p`:
//!
//! ```text
//! chain(task) = p, parent(p), parent(parent(p)), ...   (until a root)
//! tags(task)  = dedup(own_tags(task) ++ own_tags(chain...))
//! notes(task) = own_note(task) ++ own_note(chain...)    (newline-joined)
//! ```
//!
//! Lookups go through a [`ParentIndex`] built once per run from the
//! pre-inheritance columns, so results never depend on row order. Parent
//! cells are matched against the cleaned Name first, then against the name
//! as it was before the quantity split. Each walk owns its visited set,
//! seeded with the task itself; a name seen twice ends the walk and keeps
//! what was collected so far.

use std::collections::{HashMap, HashSet};

use crate::core::column::Column;
use crate::core::table::{TaskTable, Value};

/// Separator used when re-joining resolved tags
pub const TAG_SEPARATOR: &str = ", ";

/// Separator used when re-joining resolved notes
pub const NOTE_SEPARATOR: &str = "\n";

/// A task's own attributes as they appear in the export
#[derive(Debug, Clone, Copy, Default)]
struct OwnAttributes<'a> {
    tags: Option<&'a str>,
    notes: Option<&'a str>,
    parent: Option<&'a str>,
}

/// Attributes contributed by an ancestor chain, nearest ancestor first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inherited {
    pub tags: Vec<String>,
    pub notes: Vec<String>,
    /// The walk stopped at a name it had already visited
    pub cycle: bool,
    /// The walk stopped at a parent name no row carries
    pub unresolved: bool,
}

/// Counters reported after a resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InheritanceStats {
    /// Rows with a parent whose tags/notes were rewritten
    pub rows_resolved: usize,
    /// Walks cut short by a parent cycle
    pub cycles: usize,
    /// Walks that ended at an unknown parent name
    pub unresolved: usize,
}

/// Column indices the resolver needs
#[derive(Debug, Clone, Copy)]
pub struct HierarchyColumns {
    pub name: usize,
    pub parent: usize,
    pub tags: usize,
    pub notes: usize,
}

impl HierarchyColumns {
    /// Locate the columns; `None` when any of them is missing
    pub fn locate(table: &TaskTable) -> Option<Self> {
        Some(Self {
            name: table.index_of(Column::Name)?,
            parent: table.index_of(Column::ParentTask)?,
            tags: table.index_of(Column::Tags)?,
            notes: table.index_of(Column::Notes)?,
        })
    }
}

/// Name → own attributes lookup over one table
#[derive(Debug)]
pub struct ParentIndex<'a> {
    by_name: HashMap<&'a str, OwnAttributes<'a>>,
    /// Names as exported, before the quantity split; consulted on a miss
    by_raw_name: HashMap<&'a str, OwnAttributes<'a>>,
}

impl<'a> ParentIndex<'a> {
    /// Index every named row. When names repeat, the last row wins.
    ///
    /// `raw_names[row]` is the row's name before the quantity split; rows
    /// past the end of the slice only have their cleaned name.
    pub fn build(
        table: &'a TaskTable,
        cols: &HierarchyColumns,
        raw_names: &'a [Option<String>],
    ) -> Self {
        let mut by_name = HashMap::with_capacity(table.len());
        let mut by_raw_name = HashMap::new();
        for row in 0..table.len() {
            let name = table.text(row, cols.name);
            let raw = raw_name(raw_names, row).filter(|raw| Some(*raw) != name);
            if name.is_none() && raw.is_none() {
                continue;
            }
            let attrs = OwnAttributes {
                tags: table.text(row, cols.tags),
                notes: table.text(row, cols.notes),
                parent: parent_name(table, row, cols),
            };
            if let Some(name) = name {
                if by_name.insert(name, attrs).is_some() {
                    tracing::debug!(name, "duplicate task name, last row wins for parent lookup");
                }
            }
            if let Some(raw) = raw {
                by_raw_name.insert(raw, attrs);
            }
        }
        tracing::debug!(
            names = by_name.len(),
            raw_names = by_raw_name.len(),
            "parent index built"
        );
        Self {
            by_name,
            by_raw_name,
        }
    }

    fn lookup(&self, name: &str) -> Option<&OwnAttributes<'a>> {
        self.by_name
            .get(name)
            .or_else(|| self.by_raw_name.get(name))
    }

    /// Walk from `parent` to the root, collecting what each ancestor passes down.
    ///
    /// `task` holds the names of the task being resolved; they count as
    /// visited so a chain leading back to it stops before re-adding its own
    /// attributes.
    pub fn ancestors_of(&self, task: &[&str], parent: &str) -> Inherited {
        let mut visited: HashSet<String> = task.iter().map(|n| n.to_string()).collect();
        self.walk(parent, &mut visited)
    }

    fn walk(&self, start: &str, visited: &mut HashSet<String>) -> Inherited {
        let mut inherited = Inherited::default();
        let mut next = Some(start);

        while let Some(name) = next {
            if !visited.insert(name.to_string()) {
                tracing::debug!(name, "parent cycle detected, stopping walk");
                inherited.cycle = true;
                break;
            }
            let Some(attrs) = self.lookup(name) else {
                tracing::debug!(name, "parent task not found");
                inherited.unresolved = true;
                break;
            };

            inherited
                .tags
                .extend(split_tags(attrs.tags).map(str::to_string));
            if let Some(note) = attrs.notes {
                inherited.notes.push(note.to_string());
            }
            next = attrs.parent;
        }

        inherited
    }
}

/// Comma-separated tags, trimmed, empty entries dropped
pub fn split_tags(tags: Option<&str>) -> impl Iterator<Item = &str> {
    tags.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Own tags followed by inherited ones, first occurrence kept
pub fn merge_tags<'t>(own: Option<&'t str>, inherited: &'t [String]) -> Vec<&'t str> {
    let mut seen = HashSet::new();
    split_tags(own)
        .chain(inherited.iter().map(String::as_str))
        .filter(|t| seen.insert(*t))
        .collect()
}

fn raw_name(raw_names: &[Option<String>], row: usize) -> Option<&str> {
    raw_names
        .get(row)
        .and_then(|n| n.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
}

fn parent_name<'a>(table: &'a TaskTable, row: usize, cols: &HierarchyColumns) -> Option<&'a str> {
    table
        .text(row, cols.parent)
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Rewrite Tags and Notes of every row with a parent task.
///
/// No-op unless Name, Parent task, Tags and Notes all exist. Rows without a
/// parent are left untouched.
pub fn resolve_inheritance(table: &mut TaskTable) -> InheritanceStats {
    resolve_inheritance_with_raw_names(table, &[])
}

/// [`resolve_inheritance`], also matching parents against the names each
/// row had before the quantity split
pub fn resolve_inheritance_with_raw_names(
    table: &mut TaskTable,
    raw_names: &[Option<String>],
) -> InheritanceStats {
    let Some(cols) = HierarchyColumns::locate(table) else {
        tracing::debug!("hierarchy columns missing, skipping inheritance");
        return InheritanceStats::default();
    };

    let mut stats = InheritanceStats::default();
    let mut updates = Vec::new();
    {
        let index = ParentIndex::build(table, &cols, raw_names);
        for row in 0..table.len() {
            let Some(parent) = parent_name(table, row, &cols) else {
                continue;
            };
            let own_names: Vec<&str> = table
                .text(row, cols.name)
                .into_iter()
                .chain(raw_name(raw_names, row))
                .collect();
            let inherited = index.ancestors_of(&own_names, parent);
            if inherited.cycle {
                stats.cycles += 1;
            }
            if inherited.unresolved {
                stats.unresolved += 1;
            }

            let tags = merge_tags(table.text(row, cols.tags), &inherited.tags);
            let notes: Vec<&str> = table
                .text(row, cols.notes)
                .into_iter()
                .chain(inherited.notes.iter().map(String::as_str))
                .collect();

            updates.push((row, join(&tags, TAG_SEPARATOR), join(&notes, NOTE_SEPARATOR)));
        }
    }

    for (row, tags, notes) in updates {
        table.set(row, cols.tags, tags);
        table.set(row, cols.notes, notes);
        stats.rows_resolved += 1;
    }

    stats
}

fn join(parts: &[&str], separator: &str) -> Option<Value> {
    if parts.is_empty() {
        None
    } else {
        Some(Value::Text(parts.join(separator)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [&str; 4] = ["Name", "Parent task", "Tags", "Notes"];

    /// (name, parent, tags, notes)
    fn table(rows: &[(&str, &str, &str, &str)]) -> TaskTable {
        let cell = |s: &str| if s.is_empty() { None } else { Some(Value::from(s)) };
        TaskTable::new(
            COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|(n, p, t, o)| vec![cell(n), cell(p), cell(t), cell(o)])
                .collect(),
        )
    }

    fn tags(t: &TaskTable, row: usize) -> Option<&str> {
        t.text(row, 2)
    }

    fn notes(t: &TaskTable, row: usize) -> Option<&str> {
        t.text(row, 3)
    }

    #[test]
    fn test_three_level_chain_orders_nearest_first() {
        let mut t = table(&[
            ("Root", "", "A", ""),
            ("Mid", "Root", "B", ""),
            ("Leaf", "Mid", "C", ""),
        ]);
        let stats = resolve_inheritance(&mut t);

        assert_eq!(tags(&t, 2), Some("C, B, A"));
        assert_eq!(tags(&t, 1), Some("B, A"));
        assert_eq!(tags(&t, 0), Some("A"));
        assert_eq!(stats.rows_resolved, 2);
        assert_eq!(stats.cycles, 0);
    }

    #[test]
    fn test_rerun_from_original_columns_is_stable() {
        let rows = [
            ("Root", "", "A", ""),
            ("Mid", "Root", "B", ""),
            ("Leaf", "Mid", "C", ""),
        ];
        let mut first = table(&rows);
        resolve_inheritance(&mut first);
        let mut second = table(&rows);
        resolve_inheritance(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_tags_keep_first_occurrence() {
        let mut t = table(&[
            ("Root", "", "blue, red", ""),
            ("Child", "Root", "red, , green", ""),
        ]);
        resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 1), Some("red, green, blue"));
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let mut t = table(&[("Root", "", "Red", ""), ("Child", "Root", "red", "")]);
        resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 1), Some("red, Red"));
    }

    #[test]
    fn test_notes_are_newline_joined_child_first() {
        let mut t = table(&[
            ("Root", "", "", "root note"),
            ("Mid", "Root", "", ""),
            ("Leaf", "Mid", "", "leaf note"),
        ]);
        resolve_inheritance(&mut t);
        assert_eq!(notes(&t, 2), Some("leaf note\nroot note"));
        assert_eq!(notes(&t, 1), Some("root note"));
        assert_eq!(notes(&t, 0), Some("root note"));
    }

    #[test]
    fn test_mutual_parents_terminate() {
        let mut t = table(&[("X", "Y", "x", "nx"), ("Y", "X", "y", "ny")]);
        let stats = resolve_inheritance(&mut t);

        assert_eq!(stats.cycles, 2);
        assert_eq!(tags(&t, 0), Some("x, y"));
        assert_eq!(tags(&t, 1), Some("y, x"));
        assert_eq!(notes(&t, 0), Some("nx\nny"));
    }

    #[test]
    fn test_self_parent_keeps_own_tags() {
        let mut t = table(&[("Loop", "Loop", "a, b", "")]);
        let stats = resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 0), Some("a, b"));
        assert_eq!(stats.cycles, 1);
    }

    #[test]
    fn test_cycle_above_the_task_keeps_partial_chain() {
        let mut t = table(&[
            ("P", "Q", "p", ""),
            ("Q", "P", "q", ""),
            ("Leaf", "P", "leaf", ""),
        ]);
        resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 2), Some("leaf, p, q"));
    }

    #[test]
    fn test_unresolved_parent_contributes_nothing() {
        let mut t = table(&[("Child", "Ghost", "own", "")]);
        let stats = resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 0), Some("own"));
        assert_eq!(stats.unresolved, 1);
    }

    #[test]
    fn test_rows_without_parent_untouched() {
        let mut t = table(&[("Solo", "", " spaced ,tags ", "")]);
        resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 0), Some(" spaced ,tags "));
    }

    #[test]
    fn test_duplicate_names_last_row_wins() {
        let mut t = table(&[
            ("Parent", "", "first", ""),
            ("Parent", "", "second", ""),
            ("Child", "Parent", "", ""),
        ]);
        resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 2), Some("second"));
    }

    #[test]
    fn test_child_listed_before_parent() {
        let mut t = table(&[("Child", "Parent", "red", ""), ("Parent", "", "blue", "")]);
        resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 0), Some("red, blue"));
    }

    #[test]
    fn test_missing_column_is_noop() {
        let mut t = TaskTable::new(
            vec!["Name".into(), "Parent task".into(), "Tags".into()],
            vec![vec![Some("Child".into()), Some("Parent".into()), Some("x".into())]],
        );
        let before = t.clone();
        let stats = resolve_inheritance(&mut t);
        assert_eq!(stats, InheritanceStats::default());
        assert_eq!(t, before);
    }

    #[test]
    fn test_capitalized_parent_header_is_recognized() {
        let mut t = TaskTable::new(
            vec!["Name".into(), "Parent Task".into(), "Tags".into(), "Notes".into()],
            vec![
                vec![Some("P".into()), None, Some("blue".into()), None],
                vec![Some("C".into()), Some("P".into()), None, None],
            ],
        );
        resolve_inheritance(&mut t);
        assert_eq!(t.text(1, 2), Some("blue"));
    }

    #[test]
    fn test_parent_named_with_quantity_falls_back_to_raw_name() {
        let mut t = table(&[
            ("Large Pad", "", "blue", "thick foam"),
            ("Small Pad", "Large Pad 4", "red", ""),
        ]);
        let raw = vec![Some("Large Pad 4".to_string()), Some("Small Pad 2".to_string())];
        let stats = resolve_inheritance_with_raw_names(&mut t, &raw);

        assert_eq!(tags(&t, 1), Some("red, blue"));
        assert_eq!(notes(&t, 1), Some("thick foam"));
        assert_eq!(stats.unresolved, 0);
    }

    #[test]
    fn test_parent_named_with_quantity_without_raw_names_is_unresolved() {
        let mut t = table(&[
            ("Large Pad", "", "blue", ""),
            ("Small Pad", "Large Pad 4", "red", ""),
        ]);
        let stats = resolve_inheritance(&mut t);
        assert_eq!(tags(&t, 1), Some("red"));
        assert_eq!(stats.unresolved, 1);
    }

    #[test]
    fn test_cleaned_name_wins_over_raw_name() {
        let mut t = table(&[
            ("Pad", "", "cleaned", ""),
            ("Other", "", "raw", ""),
            ("Child", "Pad", "", ""),
        ]);
        let raw = vec![Some("Pad 2".to_string()), Some("Pad".to_string()), None];
        resolve_inheritance_with_raw_names(&mut t, &raw);
        assert_eq!(tags(&t, 2), Some("cleaned"));
    }

    #[test]
    fn test_self_parent_by_raw_name_keeps_own_tags() {
        let mut t = table(&[("Loop", "Loop 2", "a", "note")]);
        let raw = vec![Some("Loop 2".to_string())];
        let stats = resolve_inheritance_with_raw_names(&mut t, &raw);
        assert_eq!(tags(&t, 0), Some("a"));
        assert_eq!(notes(&t, 0), Some("note"));
        assert_eq!(stats.cycles, 1);
    }

    #[test]
    fn test_merge_tags() {
        let inherited = vec!["b".to_string(), "a".to_string()];
        assert_eq!(merge_tags(Some("a, c"), &inherited), vec!["a", "c", "b"]);
        assert_eq!(merge_tags(None, &inherited), vec!["b", "a"]);
    }
}
