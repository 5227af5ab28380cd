//! Typed column storage
//!
//! Each concrete column type implements [`ColumnOps`] (and with it
//! [`Comparable`]); [`Column`] is the closed set of those types and dispatches to
//! them with a plain `match`, so every call is statically resolved.

mod boolean_column;
mod common;
mod enum_column;
mod float64_column;
mod int64_column;
mod string_column;

use std::cmp::Ordering;

pub use boolean_column::BooleanColumn;
pub use common::{
    combine_hashes, hash_value, ColumnOps, ColumnType, Comparable, HASH_RANDOM_STATE, NULL_HASH,
};
pub use enum_column::EnumColumn;
pub use float64_column::{total_cmp_f64, Float64Column};
pub use int64_column::Int64Column;
pub use string_column::StringColumn;

use crate::aggregate::AggregateFn;
use crate::error::{Error, Result};
use crate::filter::Comparator;
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// A column of any supported type
#[derive(Debug, Clone)]
pub enum Column {
    Int64(Int64Column),
    Float64(Float64Column),
    Boolean(BooleanColumn),
    String(StringColumn),
    Enum(EnumColumn),
}

macro_rules! dispatch {
    ($self:expr, $col:ident => $body:expr) => {
        match $self {
            Column::Int64($col) => $body,
            Column::Float64($col) => $body,
            Column::Boolean($col) => $body,
            Column::String($col) => $body,
            Column::Enum($col) => $body,
        }
    };
}

/// Wrap the result of a per-type operation back into the matching variant
macro_rules! dispatch_same {
    ($self:expr, $col:ident => $body:expr) => {
        match $self {
            Column::Int64($col) => Column::Int64($body),
            Column::Float64($col) => Column::Float64($body),
            Column::Boolean($col) => Column::Boolean($body),
            Column::String($col) => Column::String($body),
            Column::Enum($col) => Column::Enum($body),
        }
    };
}

impl Column {
    pub fn len(&self) -> usize {
        dispatch!(self, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        dispatch!(self, c => c.column_type())
    }

    /// New column containing only the positions of `index`, in that order
    pub fn subset(&self, index: &RowIndex) -> Column {
        dispatch_same!(self, c => c.subset(index))
    }

    /// Evaluate `comparator` against a constant for every slot of `index`.
    ///
    /// Slots are only set in `mask` for confirmed matches. On error the mask may be
    /// partially written and must be discarded.
    pub fn filter_const(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        operand: &Value,
        mask: &mut BitMask,
    ) -> Result<()> {
        dispatch!(self, c => c.filter_const(index, comparator, operand, mask))
    }

    /// Evaluate `comparator` between this column and `other`, aligned by position
    pub fn filter_column(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        other: &Column,
        mask: &mut BitMask,
    ) -> Result<()> {
        match (self, other) {
            (Column::Int64(a), Column::Int64(b)) => a.filter_column(index, comparator, b, mask),
            (Column::Float64(a), Column::Float64(b)) => {
                a.filter_column(index, comparator, b, mask)
            }
            (Column::Boolean(a), Column::Boolean(b)) => {
                a.filter_column(index, comparator, b, mask)
            }
            (Column::String(a), Column::String(b)) => a.filter_column(index, comparator, b, mask),
            (Column::Enum(a), Column::Enum(b)) => a.filter_column(index, comparator, b, mask),
            (a, b) => Err(Error::type_mismatch(
                a.column_type(),
                format!("{:?} column", b.column_type()),
            )),
        }
    }

    /// One output value per group
    pub fn aggregate(&self, groups: &[RowIndex], func: &AggregateFn) -> Result<Column> {
        dispatch!(self, c => c.aggregate(groups, func))
    }

    /// Concatenate columns in argument order; all must have the same type
    pub fn append(&self, others: &[&Column]) -> Result<Column> {
        let expected = self.column_type();
        macro_rules! same_variant {
            ($variant:ident, $col:expr) => {{
                let mut typed = Vec::with_capacity(others.len());
                for other in others {
                    match other {
                        Column::$variant(o) => typed.push(o),
                        o => {
                            return Err(Error::type_mismatch(
                                expected,
                                format!("{:?} column", o.column_type()),
                            ))
                        }
                    }
                }
                Column::$variant($col.append(&typed)?)
            }};
        }

        let appended = match self {
            Column::Int64(c) => same_variant!(Int64, c),
            Column::Float64(c) => same_variant!(Float64, c),
            Column::Boolean(c) => same_variant!(Boolean, c),
            Column::String(c) => same_variant!(String, c),
            Column::Enum(c) => same_variant!(Enum, c),
        };
        Ok(appended)
    }

    /// Render the value at storage position `i`
    pub fn string_at(&self, i: u32, na_rep: &str) -> String {
        dispatch!(self, c => c.string_at(i, na_rep))
    }

    /// Value at storage position `i`
    pub fn value_at(&self, i: u32) -> Value {
        dispatch!(self, c => c.value_at(i))
    }

    /// Compare two views of columns element by element
    pub fn equals(&self, index: &RowIndex, other: &Column, other_index: &RowIndex) -> bool {
        match (self, other) {
            (Column::Int64(a), Column::Int64(b)) => a.equals(index, b, other_index),
            (Column::Float64(a), Column::Float64(b)) => a.equals(index, b, other_index),
            (Column::Boolean(a), Column::Boolean(b)) => a.equals(index, b, other_index),
            (Column::String(a), Column::String(b)) => a.equals(index, b, other_index),
            (Column::Enum(a), Column::Enum(b)) => a.equals(index, b, other_index),
            _ => false,
        }
    }

    pub fn as_int64(&self) -> Option<&Int64Column> {
        match self {
            Column::Int64(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_float64(&self) -> Option<&Float64Column> {
        match self {
            Column::Float64(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&BooleanColumn> {
        match self {
            Column::Boolean(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringColumn> {
        match self {
            Column::String(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumColumn> {
        match self {
            Column::Enum(c) => Some(c),
            _ => None,
        }
    }
}

impl Comparable for Column {
    #[inline]
    fn compare(&self, i: u32, j: u32) -> Ordering {
        dispatch!(self, c => c.compare(i, j))
    }

    #[inline]
    fn hash(&self, i: u32, seed: u64) -> u64 {
        dispatch!(self, c => c.hash(i, seed))
    }
}

impl From<Int64Column> for Column {
    fn from(col: Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<BooleanColumn> for Column {
    fn from(col: BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<EnumColumn> for Column {
    fn from(col: EnumColumn) -> Self {
        Column::Enum(col)
    }
}

impl From<Vec<i64>> for Column {
    fn from(data: Vec<i64>) -> Self {
        Column::Int64(Int64Column::new(data))
    }
}

impl From<Vec<f64>> for Column {
    fn from(data: Vec<f64>) -> Self {
        Column::Float64(Float64Column::new(data))
    }
}

impl From<Vec<bool>> for Column {
    fn from(data: Vec<bool>) -> Self {
        Column::Boolean(BooleanColumn::new(data))
    }
}

impl From<Vec<&str>> for Column {
    fn from(data: Vec<&str>) -> Self {
        Column::String(StringColumn::new(data))
    }
}

impl From<Vec<String>> for Column {
    fn from(data: Vec<String>) -> Self {
        Column::String(StringColumn::new(data))
    }
}

impl From<Vec<Option<&str>>> for Column {
    fn from(data: Vec<Option<&str>>) -> Self {
        Column::String(StringColumn::with_nulls(data))
    }
}

impl From<Vec<Option<String>>> for Column {
    fn from(data: Vec<Option<String>>) -> Self {
        Column::String(StringColumn::with_nulls(data))
    }
}
