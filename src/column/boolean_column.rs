use std::cmp::Ordering;
use std::sync::Arc;

use crate::aggregate::{AggregateFn, CustomAggregation};
use crate::column::common::{
    combine_hashes, filter_null_operand, gather, group_counts, group_values, hash_value,
    mark_matches, ColumnOps, ColumnType, Comparable,
};
use crate::column::Column;
use crate::error::{Error, Result};
use crate::filter::Comparator;
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// Column of booleans. Only `eq`/`neq` filters are defined; `false < true` is used
/// for grouping, sorting and min/max.
#[derive(Debug, Clone)]
pub struct BooleanColumn {
    pub(crate) data: Arc<[bool]>,
}

impl BooleanColumn {
    pub fn new(data: Vec<bool>) -> Self {
        Self { data: data.into() }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.data.get(index).copied()
    }

    pub fn values(&self) -> &[bool] {
        &self.data
    }

    fn check_comparator(comparator: Comparator) -> Result<()> {
        if comparator.is_ordering() {
            return Err(Error::unsupported(
                format!("filter {}", comparator),
                ColumnType::Boolean,
            ));
        }
        Ok(())
    }
}

impl Comparable for BooleanColumn {
    #[inline]
    fn compare(&self, i: u32, j: u32) -> Ordering {
        self.data[i as usize].cmp(&self.data[j as usize])
    }

    #[inline]
    fn hash(&self, i: u32, seed: u64) -> u64 {
        combine_hashes(seed, hash_value(&self.data[i as usize]))
    }
}

impl ColumnOps for BooleanColumn {
    fn column_type(&self) -> ColumnType {
        ColumnType::Boolean
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn subset(&self, index: &RowIndex) -> Self {
        Self {
            data: index.iter().map(|pos| self.data[pos as usize]).collect(),
        }
    }

    fn filter_const(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        operand: &Value,
        mask: &mut BitMask,
    ) -> Result<()> {
        Self::check_comparator(comparator)?;
        match operand {
            Value::Bool(v) => {
                let data = &self.data;
                mark_matches(index, mask, |pos| {
                    comparator.matches(data[pos as usize].cmp(v))
                });
                Ok(())
            }
            Value::Null => filter_null_operand(index, comparator, mask, |_| false),
            other => Err(Error::type_mismatch(ColumnType::Boolean, other.type_name())),
        }
    }

    fn filter_column(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        other: &Self,
        mask: &mut BitMask,
    ) -> Result<()> {
        Self::check_comparator(comparator)?;
        let (left, right) = (&self.data, &other.data);
        mark_matches(index, mask, |pos| {
            comparator.matches(left[pos as usize].cmp(&right[pos as usize]))
        });
        Ok(())
    }

    fn aggregate(&self, groups: &[RowIndex], func: &AggregateFn) -> Result<Column> {
        let data = &self.data[..];
        let reduced: Vec<bool> = match func {
            AggregateFn::Min => groups
                .iter()
                .map(|g| group_values(data, g).all(|v| v))
                .collect(),
            AggregateFn::Max => groups
                .iter()
                .map(|g| group_values(data, g).any(|v| v))
                .collect(),
            AggregateFn::Count => return Ok(group_counts(groups)),
            AggregateFn::Custom(CustomAggregation::Bool(f)) => {
                groups.iter().map(|g| f(&gather(data, g))).collect()
            }
            AggregateFn::Custom(custom) => {
                return Err(Error::type_mismatch(
                    ColumnType::Boolean,
                    custom.element_type(),
                ))
            }
            other => {
                return Err(Error::unsupported(
                    format!("aggregate {}", other.name()),
                    ColumnType::Boolean,
                ))
            }
        };
        Ok(Column::Boolean(BooleanColumn::new(reduced)))
    }

    fn append(&self, others: &[&Self]) -> Result<Self> {
        let mut data = self.data.to_vec();
        for other in others {
            data.extend_from_slice(&other.data);
        }
        Ok(Self::new(data))
    }

    fn string_at(&self, i: u32, _na_rep: &str) -> String {
        self.data[i as usize].to_string()
    }

    fn value_at(&self, i: u32) -> Value {
        Value::Bool(self.data[i as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_comparator_unsupported() {
        let col = BooleanColumn::new(vec![true, false]);
        let mut mask = BitMask::new(2);
        let err = col
            .filter_const(&RowIndex::ascending(2), Comparator::Lt, &Value::Bool(true), &mut mask)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedOperation {
                column_type: ColumnType::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn test_filter_neq() {
        let col = BooleanColumn::new(vec![true, false, true]);
        let mut mask = BitMask::new(3);
        col.filter_const(&RowIndex::ascending(3), Comparator::Neq, &Value::Bool(true), &mut mask)
            .unwrap();
        assert_eq!(mask.to_bools(), vec![false, true, false]);
    }

    #[test]
    fn test_min_is_all_max_is_any() {
        let col = BooleanColumn::new(vec![true, false, true, true]);
        let groups = vec![RowIndex::new(vec![0, 1]), RowIndex::new(vec![2, 3])];
        let min = col.aggregate(&groups, &AggregateFn::Min).unwrap();
        let max = col.aggregate(&groups, &AggregateFn::Max).unwrap();
        assert_eq!(min.value_at(0), Value::Bool(false));
        assert_eq!(min.value_at(1), Value::Bool(true));
        assert_eq!(max.value_at(0), Value::Bool(true));
        assert!(col.aggregate(&groups, &AggregateFn::Sum).is_err());
    }
}
