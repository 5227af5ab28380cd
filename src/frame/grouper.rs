use std::collections::HashSet;

use crate::aggregate::Aggregation;
use crate::column::{Column, Int64Column};
use crate::error::{Error, Result};
use crate::grouper::GroupStats;
use crate::index::RowIndex;

use super::Frame;

/// Rows of a frame partitioned into groups of equal key values.
///
/// Produced by [`Frame::group_by`]. Group order is not defined.
#[derive(Debug, Clone)]
pub struct Grouper {
    frame: Frame,
    group_columns: Vec<String>,
    groups: Vec<RowIndex>,
    stats: GroupStats,
}

impl Grouper {
    pub(crate) fn new(
        frame: Frame,
        group_columns: Vec<String>,
        groups: Vec<RowIndex>,
        stats: GroupStats,
    ) -> Self {
        Self {
            frame,
            group_columns,
            groups,
            stats,
        }
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn stats(&self) -> &GroupStats {
        &self.stats
    }

    pub fn group_columns(&self) -> &[String] {
        &self.group_columns
    }

    /// Storage positions of every group's rows
    pub fn groups(&self) -> &[RowIndex] {
        &self.groups
    }

    /// Reduce every group to one row.
    ///
    /// The result holds the group columns followed by one column per aggregation,
    /// in the given order. All aggregations are validated before any of them runs,
    /// so an unknown column or a name conflict never yields a partial frame.
    pub fn aggregate(&self, aggregations: &[Aggregation]) -> Result<Frame> {
        let mut taken: HashSet<&str> = self.group_columns.iter().map(String::as_str).collect();
        for aggregation in aggregations {
            if !self.frame.contains(&aggregation.column) {
                return Err(Error::UnknownColumn(aggregation.column.clone()));
            }
            if !taken.insert(aggregation.destination()) {
                return Err(Error::AggregateNameConflict(
                    aggregation.destination().to_string(),
                ));
            }
        }

        let firsts: RowIndex = self.groups.iter().filter_map(|g| g.get(0)).collect();
        let mut columns: Vec<(String, Column)> =
            Vec::with_capacity(self.group_columns.len() + aggregations.len());
        for name in &self.group_columns {
            let column = self.frame.column_ref(name)?;
            columns.push((name.clone(), column.subset(&firsts)));
        }

        for aggregation in aggregations {
            let reduced = if aggregation.func.is_count() {
                Column::Int64(Int64Column::new(
                    self.groups.iter().map(|g| g.len() as i64).collect(),
                ))
            } else {
                self.frame
                    .column_ref(&aggregation.column)?
                    .aggregate(&self.groups, &aggregation.func)?
            };
            columns.push((aggregation.destination().to_string(), reduced));
        }

        Frame::new(columns)
    }

    /// One frame per group, sharing the columns of the grouped frame
    pub fn frames(&self) -> Vec<Frame> {
        self.groups
            .iter()
            .map(|group| self.frame.with_index(group.clone()))
            .collect()
    }
}
