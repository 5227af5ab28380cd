use std::cmp::Ordering;
use std::sync::Arc;

use crate::aggregate::{AggregateFn, CustomAggregation};
use crate::column::common::{
    combine_hashes, filter_null_operand, gather, group_counts, group_values, hash_value, mark_matches,
    numeric_mean, ColumnOps, ColumnType, Comparable,
};
use crate::column::float64_column::{float_matches, Float64Column};
use crate::column::Column;
use crate::error::{Error, Result};
use crate::filter::Comparator;
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// Column of 64-bit integers
#[derive(Debug, Clone)]
pub struct Int64Column {
    pub(crate) data: Arc<[i64]>,
}

impl Int64Column {
    pub fn new(data: Vec<i64>) -> Self {
        Self { data: data.into() }
    }

    /// Value at storage position `index`
    pub fn get(&self, index: usize) -> Option<i64> {
        self.data.get(index).copied()
    }

    /// Backing storage in physical order
    pub fn values(&self) -> &[i64] {
        &self.data
    }
}

impl Comparable for Int64Column {
    #[inline]
    fn compare(&self, i: u32, j: u32) -> Ordering {
        self.data[i as usize].cmp(&self.data[j as usize])
    }

    #[inline]
    fn hash(&self, i: u32, seed: u64) -> u64 {
        combine_hashes(seed, hash_value(&self.data[i as usize]))
    }
}

impl ColumnOps for Int64Column {
    fn column_type(&self) -> ColumnType {
        ColumnType::Int64
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
        let data = &self.data;
        match operand {
            Value::Int(v) => {
                mark_matches(index, mask, |pos| {
                    comparator.matches(data[pos as usize].cmp(v))
                });
                Ok(())
            }
            Value::Float(v) => {
                mark_matches(index, mask, |pos| {
                    float_matches(comparator, data[pos as usize] as f64, *v)
                });
                Ok(())
            }
            Value::Null => filter_null_operand(index, comparator, mask, |_| false),
            other => Err(Error::type_mismatch(ColumnType::Int64, other.type_name())),
        }
    }

    fn filter_column(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        other: &Self,
        mask: &mut BitMask,
    ) -> Result<()> {
        let (left, right) = (&self.data, &other.data);
        mark_matches(index, mask, |pos| {
            comparator.matches(left[pos as usize].cmp(&right[pos as usize]))
        });
        Ok(())
    }

    fn aggregate(&self, groups: &[RowIndex], func: &AggregateFn) -> Result<Column> {
        let data = &self.data;
        let column = match func {
            AggregateFn::Sum => Column::Int64(Int64Column::new(
                groups
                    .iter()
                    .map(|g| group_values(&data[..], g).fold(0i64, |acc, v| acc.wrapping_add(v)))
                    .collect(),
            )),
            AggregateFn::Mean => Column::Float64(Float64Column::new(
                groups.iter().map(|g| numeric_mean(group_values(&data[..], g))).collect(),
            )),
            AggregateFn::Min => Column::Int64(Int64Column::new(
                groups
                    .iter()
                    .map(|g| group_values(&data[..], g).min().unwrap_or_default())
                    .collect(),
            )),
            AggregateFn::Max => Column::Int64(Int64Column::new(
                groups
                    .iter()
                    .map(|g| group_values(&data[..], g).max().unwrap_or_default())
                    .collect(),
            )),
            AggregateFn::Count => group_counts(groups),
            AggregateFn::Custom(CustomAggregation::Int(f)) => Column::Int64(Int64Column::new(
                groups.iter().map(|g| f(&gather(data, g))).collect(),
            )),
            AggregateFn::Custom(custom) => {
                return Err(Error::type_mismatch(ColumnType::Int64, custom.element_type()))
            }
        };
        Ok(column)
    }

    fn append(&self, others: &[&Self]) -> Result<Self> {
        let total = self.len() + others.iter().map(|c| c.len()).sum::<usize>();
        let mut data = Vec::with_capacity(total);
        data.extend_from_slice(&self.data);
        for other in others {
            data.extend_from_slice(&other.data);
        }
        Ok(Self::new(data))
    }

    fn string_at(&self, i: u32, _na_rep: &str) -> String {
        self.data[i as usize].to_string()
    }

    fn value_at(&self, i: u32) -> Value {
        Value::Int(self.data[i as usize])
    }
}
