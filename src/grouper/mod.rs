//! Hash grouping of rows
//!
//! Rows are grouped by equality of a composite key spread over one or more
//! [`Comparable`] columns. The work is done by an open-addressed table with linear
//! probing (see [`table`]); this module holds its configuration, its diagnostics
//! and the `group_by` / `distinct` entry points.
//!
//! Groups come out in the order of the table's slots. That order depends on hash
//! values and table capacity and must be treated as unordered. Within a group, rows
//! keep the order in which they appear in the input index.

mod table;

use serde::{Deserialize, Serialize};

use crate::column::Comparable;
use crate::index::RowIndex;

use table::GroupTable;

/// Sizing and growth parameters of the grouping table
#[derive(Clone, Debug, PartialEq)]
pub struct GroupConfig {
    /// The table grows before an insert once groups / capacity exceeds this
    pub max_load_factor: f64,
    /// Capacity multiplier applied on growth, rounded up to a power of two
    pub growth_factor: usize,
    /// Smallest capacity a table is created with
    pub min_capacity: usize,
    /// Explicit starting capacity, overriding the size heuristic
    pub initial_capacity: Option<usize>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_load_factor: 0.5,
            growth_factor: 2,
            min_capacity: 8,
            initial_capacity: None,
        }
    }
}

impl GroupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Pre-size the table, e.g. to avoid any growth when the key count is known
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Capacity of a new table for an input of `rows` rows.
    ///
    /// Without an explicit capacity this assumes moderate key duplication: the
    /// smallest power of two above `rows / 4`. The result is always a power of two
    /// and at least `min_capacity`.
    pub fn capacity_for(&self, rows: usize) -> usize {
        let wanted = self.initial_capacity.unwrap_or(rows / 4 + 1);
        wanted
            .max(self.min_capacity)
            .max(1)
            .next_power_of_two()
    }

    pub(crate) fn effective_growth_factor(&self) -> usize {
        self.growth_factor.max(2).next_power_of_two()
    }
}

/// Diagnostics collected while grouping. Informational only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Number of times the table grew
    pub relocation_count: usize,
    /// Occupied slots probed while reinserting groups during growth
    pub relocation_collisions: usize,
    /// Occupied, non-matching slots probed while inserting rows
    pub insert_collisions: usize,
    /// Number of distinct keys found
    pub group_count: usize,
    /// Groups / capacity of the final table
    pub load_factor: f64,
}

/// Group the rows of `index` by the values of `columns`.
///
/// Returns one [`RowIndex`] per distinct key plus the table diagnostics.
pub fn group_by<C: Comparable>(index: &RowIndex, columns: &[C]) -> (Vec<RowIndex>, GroupStats) {
    group_by_with_config(index, columns, &GroupConfig::default())
}

pub fn group_by_with_config<C: Comparable>(
    index: &RowIndex,
    columns: &[C],
    config: &GroupConfig,
) -> (Vec<RowIndex>, GroupStats) {
    let table = build(index, columns, config, true);
    table.into_groups()
}

/// First-seen row of every distinct key of `columns` over `index`
pub fn distinct<C: Comparable>(index: &RowIndex, columns: &[C]) -> RowIndex {
    distinct_with_config(index, columns, &GroupConfig::default())
}

pub fn distinct_with_config<C: Comparable>(
    index: &RowIndex,
    columns: &[C],
    config: &GroupConfig,
) -> RowIndex {
    let table = build(index, columns, config, false);
    table.into_first_positions().0
}

fn build<'c, C: Comparable>(
    index: &RowIndex,
    columns: &'c [C],
    config: &GroupConfig,
    collect_members: bool,
) -> GroupTable<'c, C> {
    let mut table = GroupTable::new(
        columns,
        config.capacity_for(index.len()),
        config,
        collect_members,
    );
    for pos in index.iter() {
        table.insert(pos);
    }
    log::debug!(
        "grouped {} rows into {} groups: capacity {}, load factor {:.3}, {} relocations, {} relocation collisions, {} insert collisions",
        index.len(),
        table.group_count(),
        table.capacity(),
        table.load_factor(),
        table.stats().relocation_count,
        table.stats().relocation_collisions,
        table.stats().insert_collisions,
    );
    table
}
