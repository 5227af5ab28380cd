//! Open-addressed grouping table
//!
//! Layout: `slots` is the probe array, power-of-two sized, each slot holding either
//! [`EMPTY`] or the index of a [`GroupRecord`] in `records`. Records never move, so
//! growth only rebuilds `slots`. Member lists live in a separate store and are
//! created lazily on a group's second row; singleton groups never allocate.

use crate::column::Comparable;
use crate::index::RowIndex;

use super::{GroupConfig, GroupStats};

const EMPTY: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct GroupRecord {
    hash: u64,
    first_pos: u32,
    /// Index into the member store, set once the group has a second row
    members: Option<u32>,
}

pub(super) struct GroupTable<'c, C> {
    slots: Vec<u32>,
    records: Vec<GroupRecord>,
    members: Vec<Vec<u32>>,
    columns: &'c [C],
    collect_members: bool,
    max_load_factor: f64,
    growth_factor: usize,
    stats: GroupStats,
}

impl<'c, C: Comparable> GroupTable<'c, C> {
    pub(super) fn new(
        columns: &'c [C],
        capacity: usize,
        config: &GroupConfig,
        collect_members: bool,
    ) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            slots: vec![EMPTY; capacity],
            records: Vec::new(),
            members: Vec::new(),
            columns,
            collect_members,
            max_load_factor: config.max_load_factor,
            growth_factor: config.effective_growth_factor(),
            stats: GroupStats::default(),
        }
    }

    pub(super) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(super) fn group_count(&self) -> usize {
        self.records.len()
    }

    pub(super) fn load_factor(&self) -> f64 {
        self.records.len() as f64 / self.slots.len() as f64
    }

    pub(super) fn stats(&self) -> &GroupStats {
        &self.stats
    }

    /// Composite hash of row `pos`, chaining the seed through the columns in order
    #[inline]
    fn row_hash(&self, pos: u32) -> u64 {
        self.columns
            .iter()
            .fold(0u64, |seed, column| column.hash(pos, seed))
    }

    /// Add row `pos` to its group, creating the group if the key is new
    pub(super) fn insert(&mut self, pos: u32) {
        if self.load_factor() > self.max_load_factor || self.records.len() == self.slots.len() {
            self.grow();
        }

        let hash = self.row_hash(pos);
        let mask = self.slots.len() - 1;
        let mut slot = hash as usize & mask;
        loop {
            let record_ix = self.slots[slot];
            if record_ix == EMPTY {
                self.slots[slot] = self.records.len() as u32;
                self.records.push(GroupRecord {
                    hash,
                    first_pos: pos,
                    members: None,
                });
                return;
            }

            let record = &mut self.records[record_ix as usize];
            if record.hash == hash && rows_equal(self.columns, pos, record.first_pos) {
                if self.collect_members {
                    match record.members {
                        Some(m) => self.members[m as usize].push(pos),
                        None => {
                            record.members = Some(self.members.len() as u32);
                            self.members.push(vec![record.first_pos, pos]);
                        }
                    }
                }
                return;
            }

            self.stats.insert_collisions += 1;
            slot = (slot + 1) & mask;
        }
    }

    /// Rebuild the probe array at `growth_factor` times the capacity, placing every
    /// group by its cached hash
    fn grow(&mut self) {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity * self.growth_factor;
        let mask = new_capacity - 1;
        let mut slots = vec![EMPTY; new_capacity];
        for &record_ix in self.slots.iter().filter(|&&ix| ix != EMPTY) {
            let mut slot = self.records[record_ix as usize].hash as usize & mask;
            while slots[slot] != EMPTY {
                self.stats.relocation_collisions += 1;
                slot = (slot + 1) & mask;
            }
            slots[slot] = record_ix;
        }
        self.slots = slots;
        self.stats.relocation_count += 1;
        log::debug!(
            "grouping table grew from {} to {} slots ({} groups)",
            old_capacity,
            new_capacity,
            self.records.len()
        );
    }

    fn final_stats(&self) -> GroupStats {
        GroupStats {
            group_count: self.records.len(),
            load_factor: self.load_factor(),
            ..self.stats
        }
    }

    /// Row positions of every group, in slot order
    pub(super) fn into_groups(mut self) -> (Vec<RowIndex>, GroupStats) {
        let stats = self.final_stats();
        let mut groups = Vec::with_capacity(self.records.len());
        for &record_ix in self.slots.iter().filter(|&&ix| ix != EMPTY) {
            let record = self.records[record_ix as usize];
            let positions = match record.members {
                Some(m) => std::mem::take(&mut self.members[m as usize]),
                None => vec![record.first_pos],
            };
            groups.push(RowIndex::new(positions));
        }
        (groups, stats)
    }

    /// First-seen row of every group, in slot order
    pub(super) fn into_first_positions(self) -> (RowIndex, GroupStats) {
        let stats = self.final_stats();
        let firsts = self
            .slots
            .iter()
            .filter(|&&ix| ix != EMPTY)
            .map(|&ix| self.records[ix as usize].first_pos)
            .collect();
        (firsts, stats)
    }
}

#[inline]
fn rows_equal<C: Comparable>(columns: &[C], i: u32, j: u32) -> bool {
    columns
        .iter()
        .all(|c| c.compare(i, j) == std::cmp::Ordering::Equal)
}
