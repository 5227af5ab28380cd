use std::cmp::Ordering;
use std::sync::Arc;

use crate::aggregate::{AggregateFn, CustomAggregation};
use crate::column::common::{
    combine_hashes, compare_nullable, filter_null_operand, group_counts, hash_value,
    mark_matches, nullable_matches, ColumnOps, ColumnType, Comparable, NULL_HASH,
};
use crate::column::Column;
use crate::error::{Error, Result};
use crate::filter::Comparator;
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// Column of nullable strings
///
/// Cells are reference counted so subsetting and appending never copy string data.
#[derive(Debug, Clone)]
pub struct StringColumn {
    pub(crate) data: Arc<[Option<Arc<str>>]>,
}

impl StringColumn {
    /// Column without nulls
    pub fn new<S: AsRef<str>>(data: Vec<S>) -> Self {
        Self {
            data: data
                .iter()
                .map(|s| Some(Arc::<str>::from(s.as_ref())))
                .collect(),
        }
    }

    /// Column where `None` marks a null cell
    pub fn with_nulls<S: AsRef<str>>(data: Vec<Option<S>>) -> Self {
        Self {
            data: data
                .iter()
                .map(|s| s.as_ref().map(|s| Arc::<str>::from(s.as_ref())))
                .collect(),
        }
    }

    pub(crate) fn from_cells(data: Vec<Option<Arc<str>>>) -> Self {
        Self { data: data.into() }
    }

    /// String at storage position `index`, `None` for nulls and out of range
    pub fn get(&self, index: usize) -> Option<&str> {
        self.data.get(index).and_then(|s| s.as_deref())
    }

    #[inline]
    fn cell(&self, pos: u32) -> Option<&str> {
        self.data[pos as usize].as_deref()
    }

    pub fn null_count(&self) -> usize {
        self.data.iter().filter(|s| s.is_none()).count()
    }

    fn extreme(&self, group: &RowIndex, wanted: Ordering) -> Option<Arc<str>> {
        let mut best: Option<&Arc<str>> = None;
        for pos in group.iter() {
            if let Some(s) = &self.data[pos as usize] {
                best = match best {
                    Some(b) if s.as_ref().cmp(b.as_ref()) != wanted => Some(b),
                    _ => Some(s),
                };
            }
        }
        best.cloned()
    }
}

impl Comparable for StringColumn {
    #[inline]
    fn compare(&self, i: u32, j: u32) -> Ordering {
        compare_nullable(self.cell(i), self.cell(j), |a, b| a.cmp(b))
    }

    #[inline]
    fn hash(&self, i: u32, seed: u64) -> u64 {
        match self.cell(i) {
            Some(s) => combine_hashes(seed, hash_value(s)),
            None => combine_hashes(seed, NULL_HASH),
        }
    }
}

impl ColumnOps for StringColumn {
    fn column_type(&self) -> ColumnType {
        ColumnType::String
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn subset(&self, index: &RowIndex) -> Self {
        Self {
            data: index
                .iter()
                .map(|pos| self.data[pos as usize].clone())
                .collect(),
        }
    }

    fn filter_const(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        operand: &Value,
        mask: &mut BitMask,
    ) -> Result<()> {
        match operand {
            Value::Str(v) => {
                let operand = v.as_str();
                mark_matches(index, mask, |pos| {
                    nullable_matches(comparator, self.cell(pos), Some(operand), |a, b| a.cmp(b))
                });
                Ok(())
            }
            Value::Null => {
                filter_null_operand(index, comparator, mask, |pos| self.cell(pos).is_none())
            }
            other => Err(Error::type_mismatch(ColumnType::String, other.type_name())),
        }
    }

    fn filter_column(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        other: &Self,
        mask: &mut BitMask,
    ) -> Result<()> {
        mark_matches(index, mask, |pos| {
            nullable_matches(comparator, self.cell(pos), other.cell(pos), |a, b| a.cmp(b))
        });
        Ok(())
    }

    fn aggregate(&self, groups: &[RowIndex], func: &AggregateFn) -> Result<Column> {
        let reduced: Vec<Option<Arc<str>>> = match func {
            AggregateFn::Min => groups
                .iter()
                .map(|g| self.extreme(g, Ordering::Less))
                .collect(),
            AggregateFn::Max => groups
                .iter()
                .map(|g| self.extreme(g, Ordering::Greater))
                .collect(),
            AggregateFn::Count => return Ok(group_counts(groups)),
            AggregateFn::Custom(CustomAggregation::Str(f)) => groups
                .iter()
                .map(|g| {
                    let cells: Vec<Option<&str>> = g.iter().map(|pos| self.cell(pos)).collect();
                    f(&cells).map(Arc::from)
                })
                .collect(),
            AggregateFn::Custom(custom) => {
                return Err(Error::type_mismatch(
                    ColumnType::String,
                    custom.element_type(),
                ))
            }
            other => {
                return Err(Error::unsupported(
                    format!("aggregate {}", other.name()),
                    ColumnType::String,
                ))
            }
        };
        Ok(Column::String(StringColumn::from_cells(reduced)))
    }

    fn append(&self, others: &[&Self]) -> Result<Self> {
        let mut data = self.data.to_vec();
        for other in others {
            data.extend(other.data.iter().cloned());
        }
        Ok(Self::from_cells(data))
    }

    fn string_at(&self, i: u32, na_rep: &str) -> String {
        self.cell(i).unwrap_or(na_rep).to_string()
    }

    fn value_at(&self, i: u32) -> Value {
        match self.cell(i) {
            Some(s) => Value::Str(s.to_string()),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StringColumn {
        StringColumn::with_nulls(vec![Some("b"), None, Some("a"), Some("c"), None])
    }

    #[test]
    fn test_nulls_sort_first_and_equal() {
        let col = sample();
        assert_eq!(col.compare(1, 4), Ordering::Equal);
        assert_eq!(col.compare(1, 2), Ordering::Less);
        assert_eq!(col.compare(0, 2), Ordering::Greater);
        assert_eq!(col.hash(1, 3), col.hash(4, 3));
    }

    #[test]
    fn test_ordering_filters_skip_nulls() {
        let col = sample();
        let ix = RowIndex::ascending(5);
        let mut mask = BitMask::new(5);
        col.filter_const(&ix, Comparator::Lt, &Value::from("c"), &mut mask)
            .unwrap();
        assert_eq!(mask.to_bools(), vec![true, false, true, false, false]);

        let mut neq = BitMask::new(5);
        col.filter_const(&ix, Comparator::Neq, &Value::from("a"), &mut neq)
            .unwrap();
        assert_eq!(neq.to_bools(), vec![true, true, false, true, true]);
    }

    #[test]
    fn test_null_operand() {
        let col = sample();
        let ix = RowIndex::ascending(5);
        let mut mask = BitMask::new(5);
        col.filter_const(&ix, Comparator::Eq, &Value::Null, &mut mask)
            .unwrap();
        assert_eq!(mask.to_bools(), vec![false, true, false, false, true]);

        let mut bad = BitMask::new(5);
        let err = col
            .filter_const(&ix, Comparator::Gt, &Value::Null, &mut bad)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperand(_)));
    }

    #[test]
    fn test_min_max_skip_nulls() {
        let col = sample();
        let groups = vec![RowIndex::new(vec![0, 1, 2]), RowIndex::new(vec![1, 4])];
        let min = col.aggregate(&groups, &AggregateFn::Min).unwrap();
        let max = col.aggregate(&groups, &AggregateFn::Max).unwrap();
        assert_eq!(min.value_at(0), Value::from("a"));
        assert_eq!(max.value_at(0), Value::from("b"));
        assert_eq!(min.value_at(1), Value::Null);
    }

    #[test]
    fn test_custom_string_aggregation() {
        let col = sample();
        let join = AggregateFn::string(|cells: &[Option<&str>]| {
            Some(cells.iter().map(|c| c.unwrap_or("-")).collect::<Vec<_>>().join("|"))
        });
        let out = col
            .aggregate(&[RowIndex::new(vec![2, 1, 0])], &join)
            .unwrap();
        assert_eq!(out.value_at(0), Value::from("a|-|b"));
    }
}
