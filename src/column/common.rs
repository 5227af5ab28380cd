use std::cmp::Ordering;
use std::hash::Hash;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateFn;
use crate::column::Column;
use crate::error::{Error, Result};
use crate::filter::Comparator;
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// Enum identifying the type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Int64,
    Float64,
    Boolean,
    String,
    Enum,
}

/// State used for all value hashing during grouping.
///
/// Fixed seeds keep hashes reproducible within and across runs of the same build.
pub const HASH_RANDOM_STATE: RandomState = RandomState::with_seeds(0, 0, 0, 0);

/// Hash used for null cells
pub const NULL_HASH: u64 = 0xA21258D088C87A13;

/// Hash a single value with the shared random state
#[inline]
pub fn hash_value<T: Hash + ?Sized>(value: &T) -> u64 {
    HASH_RANDOM_STATE.hash_one(value)
}

/// Fold a value hash into a running seed.
///
/// Mixing follows boost's `hash_mix`; the result depends on the order in which
/// values are folded in.
#[inline]
pub const fn combine_hashes(seed: u64, value_hash: u64) -> u64 {
    const fn mix(mut x: u64) -> u64 {
        const M: u64 = 0xE9846AF9B1A615D;
        x ^= x.wrapping_shr(32);
        x = x.wrapping_mul(M);
        x ^= x.wrapping_shr(32);
        x = x.wrapping_mul(M);
        x ^= x.wrapping_shr(28);
        x
    }

    mix(seed.wrapping_add(0x9E3779B9).wrapping_add(value_hash))
}

/// Row-level comparison and hashing, the capability grouping and sorting rely on.
///
/// `compare` must be a total order and rows that compare `Equal` must produce the
/// same `hash` for the same seed.
pub trait Comparable {
    /// Compare the values stored at positions `i` and `j`
    fn compare(&self, i: u32, j: u32) -> Ordering;

    /// Fold the value at position `i` into `seed`
    fn hash(&self, i: u32, seed: u64) -> u64;
}

impl<T: Comparable + ?Sized> Comparable for &T {
    #[inline]
    fn compare(&self, i: u32, j: u32) -> Ordering {
        (**self).compare(i, j)
    }

    #[inline]
    fn hash(&self, i: u32, seed: u64) -> u64 {
        (**self).hash(i, seed)
    }
}

/// Operations every concrete column type provides.
///
/// This is the extension point for new column types: implement it, add a variant
/// to [`Column`] and the dispatch in `column/mod.rs` picks it up.
pub trait ColumnOps: Comparable + Clone + Sized {
    fn column_type(&self) -> ColumnType;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// New column holding the values at the positions of `index`, in that order
    fn subset(&self, index: &RowIndex) -> Self;

    /// Compare the rows named by `index` against a constant, setting the matching
    /// slots of `mask`
    fn filter_const(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        operand: &Value,
        mask: &mut BitMask,
    ) -> Result<()>;

    /// Compare the rows named by `index` against the same positions of `other`
    fn filter_column(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        other: &Self,
        mask: &mut BitMask,
    ) -> Result<()>;

    /// Reduce every group to a single value
    fn aggregate(&self, groups: &[RowIndex], func: &AggregateFn) -> Result<Column>;

    /// Concatenate `self` and `others` in argument order
    fn append(&self, others: &[&Self]) -> Result<Self>;

    /// Render the value at `i`, using `na_rep` for nulls
    fn string_at(&self, i: u32, na_rep: &str) -> String;

    fn value_at(&self, i: u32) -> Value;

    /// Element-wise equality of two views
    fn equals(&self, index: &RowIndex, other: &Self, other_index: &RowIndex) -> bool {
        index.len() == other_index.len()
            && index
                .iter()
                .zip(other_index.iter())
                .all(|(i, j)| self.value_at(i) == other.value_at(j) || self.both_nan(other, i, j))
    }

    /// Only floats have values that are not equal to themselves
    #[doc(hidden)]
    fn both_nan(&self, _other: &Self, _i: u32, _j: u32) -> bool {
        false
    }
}

/// Set the slots of `mask` whose position satisfies `predicate`
#[inline]
pub(crate) fn mark_matches<F>(index: &RowIndex, mask: &mut BitMask, predicate: F)
where
    F: Fn(u32) -> bool,
{
    for (k, pos) in index.iter().enumerate() {
        if predicate(pos) {
            mask.set(k);
        }
    }
}

/// Filter against a null constant: `eq` selects nulls, `neq` selects non-nulls
pub(crate) fn filter_null_operand<F>(
    index: &RowIndex,
    comparator: Comparator,
    mask: &mut BitMask,
    is_null: F,
) -> Result<()>
where
    F: Fn(u32) -> bool,
{
    match comparator {
        Comparator::Eq => mark_matches(index, mask, |pos| is_null(pos)),
        Comparator::Neq => mark_matches(index, mask, |pos| !is_null(pos)),
        other => {
            return Err(Error::InvalidOperand(format!(
                "null operand cannot be used with comparator {}",
                other
            )))
        }
    }
    Ok(())
}

/// Comparator semantics for nullable values.
///
/// Nulls equal each other; ordering comparators never match a null on either side.
#[inline]
pub(crate) fn nullable_matches<T, F>(
    comparator: Comparator,
    left: Option<T>,
    right: Option<T>,
    cmp: F,
) -> bool
where
    F: Fn(&T, &T) -> Ordering,
{
    match (left, right) {
        (Some(l), Some(r)) => comparator.matches(cmp(&l, &r)),
        (l, r) => match comparator {
            Comparator::Eq => l.is_none() && r.is_none(),
            Comparator::Neq => l.is_some() || r.is_some(),
            _ => false,
        },
    }
}

/// Nulls first, then the value order
#[inline]
pub(crate) fn compare_nullable<T, F>(left: Option<T>, right: Option<T>, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(l), Some(r)) => cmp(&l, &r),
    }
}

/// Arithmetic mean of a group, `NaN` for an empty group
pub(crate) fn numeric_mean<T, I>(values: I) -> f64
where
    T: num_traits::ToPrimitive,
    I: IntoIterator<Item = T>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v.to_f64().unwrap_or(f64::NAN);
        count += 1;
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Group sizes as an integer column
pub(crate) fn group_counts(groups: &[RowIndex]) -> Column {
    Column::Int64(crate::column::Int64Column::new(
        groups.iter().map(|g| g.len() as i64).collect(),
    ))
}

/// Values of one group, in group order
#[inline]
pub(crate) fn group_values<'a, T: Copy>(
    data: &'a [T],
    group: &'a RowIndex,
) -> impl Iterator<Item = T> + 'a {
    group.iter().map(move |pos| data[pos as usize])
}

/// Gather the values of one group into a buffer handed to a custom aggregation
#[inline]
pub(crate) fn gather<T: Clone>(data: &[T], group: &RowIndex) -> Vec<T> {
    group.iter().map(|pos| data[pos as usize].clone()).collect()
}
