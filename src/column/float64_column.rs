use std::cmp::Ordering;
use std::sync::Arc;

use crate::aggregate::{AggregateFn, CustomAggregation};
use crate::column::common::{
    combine_hashes, filter_null_operand, gather, group_counts, group_values, hash_value, mark_matches,
    nullable_matches, numeric_mean, ColumnOps, ColumnType, Comparable,
};
use crate::column::Column;
use crate::error::{Error, Result};
use crate::filter::Comparator;
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// Total order for floats: `-0.0 == 0.0`, NaN equals NaN and sorts after every
/// other value.
#[inline]
pub fn total_cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Filter comparison for floats: NaN is the float null, so it only matches `eq`
/// against another NaN and `neq` against a number.
#[inline]
pub(crate) fn float_matches(comparator: Comparator, left: f64, right: f64) -> bool {
    let present = |v: f64| if v.is_nan() { None } else { Some(v) };
    nullable_matches(comparator, present(left), present(right), |a, b| {
        total_cmp_f64(*a, *b)
    })
}

/// Bit pattern that is identical for every value the total order calls equal
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

/// Column of 64-bit floats; NaN stands in for missing values
#[derive(Debug, Clone)]
pub struct Float64Column {
    pub(crate) data: Arc<[f64]>,
}

impl Float64Column {
    pub fn new(data: Vec<f64>) -> Self {
        Self { data: data.into() }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    fn extreme<I>(values: I, wanted: Ordering) -> f64
    where
        I: Iterator<Item = f64>,
    {
        values
            .filter(|v| !v.is_nan())
            .reduce(|acc, v| if total_cmp_f64(v, acc) == wanted { v } else { acc })
            .unwrap_or(f64::NAN)
    }
}

impl Comparable for Float64Column {
    #[inline]
    fn compare(&self, i: u32, j: u32) -> Ordering {
        total_cmp_f64(self.data[i as usize], self.data[j as usize])
    }

    #[inline]
    fn hash(&self, i: u32, seed: u64) -> u64 {
        combine_hashes(seed, hash_value(&canonical_bits(self.data[i as usize])))
    }
}

impl ColumnOps for Float64Column {
    fn column_type(&self) -> ColumnType {
        ColumnType::Float64
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
        let operand = match operand {
            Value::Float(v) => *v,
            Value::Int(v) => *v as f64,
            Value::Null => {
                return filter_null_operand(index, comparator, mask, |pos| {
                    self.data[pos as usize].is_nan()
                })
            }
            other => return Err(Error::type_mismatch(ColumnType::Float64, other.type_name())),
        };
        let data = &self.data;
        mark_matches(index, mask, |pos| {
            float_matches(comparator, data[pos as usize], operand)
        });
        Ok(())
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
            float_matches(comparator, left[pos as usize], right[pos as usize])
        });
        Ok(())
    }

    fn aggregate(&self, groups: &[RowIndex], func: &AggregateFn) -> Result<Column> {
        let data = &self.data;
        let reduced: Vec<f64> = match func {
            AggregateFn::Sum => groups.iter().map(|g| group_values(&data[..], g).sum()).collect(),
            AggregateFn::Mean => groups.iter().map(|g| numeric_mean(group_values(&data[..], g))).collect(),
            AggregateFn::Min => groups
                .iter()
                .map(|g| Self::extreme(group_values(&data[..], g), Ordering::Less))
                .collect(),
            AggregateFn::Max => groups
                .iter()
                .map(|g| Self::extreme(group_values(&data[..], g), Ordering::Greater))
                .collect(),
            AggregateFn::Count => return Ok(group_counts(groups)),
            AggregateFn::Custom(CustomAggregation::Float(f)) => {
                groups.iter().map(|g| f(&gather(data, g))).collect()
            }
            AggregateFn::Custom(custom) => {
                return Err(Error::type_mismatch(
                    ColumnType::Float64,
                    custom.element_type(),
                ))
            }
        };
        Ok(Column::Float64(Float64Column::new(reduced)))
    }

    fn append(&self, others: &[&Self]) -> Result<Self> {
        let mut data = self.data.to_vec();
        for other in others {
            data.extend_from_slice(&other.data);
        }
        Ok(Self::new(data))
    }

    fn string_at(&self, i: u32, na_rep: &str) -> String {
        let v = self.data[i as usize];
        if v.is_nan() {
            na_rep.to_string()
        } else {
            v.to_string()
        }
    }

    fn value_at(&self, i: u32) -> Value {
        Value::Float(self.data[i as usize])
    }

    fn both_nan(&self, other: &Self, i: u32, j: u32) -> bool {
        self.data[i as usize].is_nan() && other.data[j as usize].is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order_nan_last() {
        assert_eq!(total_cmp_f64(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(total_cmp_f64(f64::NAN, f64::INFINITY), Ordering::Greater);
        assert_eq!(total_cmp_f64(1.0, f64::NAN), Ordering::Less);
        assert_eq!(total_cmp_f64(-0.0, 0.0), Ordering::Equal);
    }

    #[test]
    fn test_hash_agrees_with_order() {
        let col = Float64Column::new(vec![0.0, -0.0, f64::NAN, -f64::NAN]);
        assert_eq!(col.compare(0, 1), Ordering::Equal);
        assert_eq!(col.hash(0, 7), col.hash(1, 7));
        assert_eq!(col.compare(2, 3), Ordering::Equal);
        assert_eq!(col.hash(2, 7), col.hash(3, 7));
    }

    #[test]
    fn test_filter_null_operand_selects_nan() {
        let col = Float64Column::new(vec![1.0, f64::NAN, 3.0]);
        let mut mask = BitMask::new(3);
        col.filter_const(&RowIndex::ascending(3), Comparator::Eq, &Value::Null, &mut mask)
            .unwrap();
        assert_eq!(mask.to_bools(), vec![false, true, false]);
    }

    #[test]
    fn test_min_max_skip_nan() {
        let col = Float64Column::new(vec![2.0, f64::NAN, -1.0, f64::NAN, f64::NAN]);
        let groups = vec![RowIndex::new(vec![0, 1, 2]), RowIndex::new(vec![3, 4])];
        let min = col.aggregate(&groups, &AggregateFn::Min).unwrap();
        let max = col.aggregate(&groups, &AggregateFn::Max).unwrap();
        assert_eq!(min.value_at(0), Value::Float(-1.0));
        assert_eq!(max.value_at(0), Value::Float(2.0));
        assert!(matches!(min.value_at(1), Value::Float(v) if v.is_nan()));
        assert!(matches!(max.value_at(1), Value::Float(v) if v.is_nan()));
    }

    #[test]
    fn test_ordering_filters_skip_nan() {
        let col = Float64Column::new(vec![0.5, f64::NAN, 2.0]);
        let ix = RowIndex::ascending(3);
        let run = |cmp: Comparator, v: f64| {
            let mut mask = BitMask::new(3);
            col.filter_const(&ix, cmp, &Value::Float(v), &mut mask).unwrap();
            mask.to_bools()
        };
        assert_eq!(run(Comparator::Gt, 1.0), vec![false, false, true]);
        assert_eq!(run(Comparator::Lt, f64::NAN), vec![false, false, false]);
        assert_eq!(run(Comparator::Neq, 2.0), vec![true, true, false]);
        assert_eq!(run(Comparator::Eq, f64::NAN), vec![false, true, false]);
    }

    #[test]
    fn test_equals_treats_nan_as_equal() {
        let a = Float64Column::new(vec![1.0, f64::NAN]);
        let b = Float64Column::new(vec![f64::NAN, 1.0]);
        assert!(a.equals(
            &RowIndex::ascending(2),
            &b,
            &RowIndex::new(vec![1, 0])
        ));
    }
}
