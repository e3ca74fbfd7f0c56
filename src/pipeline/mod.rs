//! Task export transformation pipeline
//!
//! Stages run in a fixed order over one owned [`TaskTable`]:
//!
//! 1. forward-fill Section/Column
//! 2. split Name into cleaned name and Quantity, place Quantity after Name
//! 3. inherit Tags/Notes down parent-task chains (parents match the cleaned
//!    or the original name)
//! 4. classify open tasks by size and color
//! 5. aggregate classified quantities
//!
//! A stage whose columns are missing is skipped, never an error.

pub mod aggregator;
pub mod classifier;
pub mod hierarchy;
pub mod normalizer;
pub mod report;
pub mod splitter;

use crate::core::config::Config;
use crate::core::table::TaskTable;

pub use aggregator::SummaryRow;
pub use classifier::{ClassifiedTask, Color, Size};
pub use hierarchy::InheritanceStats;
pub use report::{Report, ReportSources, Sheet, ViewKind};
pub use splitter::QuantityPolicy;

/// Knobs the pipeline reads
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub quantity_policy: QuantityPolicy,
    pub excluded_section: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quantity_policy: config.quantity_policy(),
            excluded_section: config.excluded_section().to_string(),
        }
    }
}

/// Counters describing one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub rows: usize,
    pub sections_filled: usize,
    pub quantities_found: usize,
    pub inheritance: InheritanceStats,
    pub classified: usize,
}

/// Everything computed from one export
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub cleaned: TaskTable,
    pub classified: Vec<ClassifiedTask>,
    pub summary: Vec<SummaryRow>,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    pub fn sources(&self) -> ReportSources<'_> {
        ReportSources {
            cleaned: &self.cleaned,
            classified: &self.classified,
            summary: &self.summary,
        }
    }

    /// Assemble the output sheets
    pub fn report(&self, config: &Config) -> Report {
        report::assemble(self.sources(), config)
    }
}

/// Run every stage over `table`
pub fn run(mut table: TaskTable, options: &PipelineOptions) -> PipelineOutput {
    let mut stats = PipelineStats {
        rows: table.len(),
        ..Default::default()
    };

    stats.sections_filled = normalizer::forward_fill_sections(&mut table);
    tracing::info!(filled = stats.sections_filled, "sections forward-filled");

    let raw_names = normalizer::name_snapshot(&table);
    stats.quantities_found = normalizer::split_quantities(&mut table, options.quantity_policy);
    normalizer::place_quantity_after_name(&mut table);
    tracing::info!(
        found = stats.quantities_found,
        policy = %options.quantity_policy,
        "quantities split from names"
    );

    stats.inheritance = hierarchy::resolve_inheritance_with_raw_names(&mut table, &raw_names);
    tracing::info!(
        resolved = stats.inheritance.rows_resolved,
        cycles = stats.inheritance.cycles,
        unresolved = stats.inheritance.unresolved,
        "parent attributes inherited"
    );

    let classified = classifier::classify(&table, &options.excluded_section);
    stats.classified = classified.len();
    tracing::info!(classified = stats.classified, "open tasks classified");

    let summary = aggregator::summarize(&classified);

    PipelineOutput {
        cleaned: table,
        classified,
        summary,
        stats,
    }
}
