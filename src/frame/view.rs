//! Read-only, row ordered access to single columns
//!
//! Views read through the frame's [`RowIndex`] and never copy column data; they
//! are the surface external consumers such as plotting code read from.

use crate::column::{
    BooleanColumn, Column, ColumnType, EnumColumn, Float64Column, Int64Column, StringColumn,
};
use crate::error::{Error, Result};
use crate::index::RowIndex;

use super::Frame;

/// A typed column seen through a row index
#[derive(Debug, Clone)]
pub struct ColumnView<'a, C> {
    column: &'a C,
    index: &'a RowIndex,
}

pub type IntView<'a> = ColumnView<'a, Int64Column>;
pub type FloatView<'a> = ColumnView<'a, Float64Column>;
pub type BoolView<'a> = ColumnView<'a, BooleanColumn>;
pub type StringView<'a> = ColumnView<'a, StringColumn>;
pub type EnumView<'a> = ColumnView<'a, EnumColumn>;

impl<'a, C> ColumnView<'a, C> {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn position(&self, row: usize) -> Result<u32> {
        self.index.get(row).ok_or(Error::IndexOutOfBounds {
            index: row,
            size: self.index.len(),
        })
    }
}

macro_rules! impl_view {
    ($lt:lifetime, $column:ty, $item:ty, |$col:ident, $pos:ident| $read:expr) => {
        impl<$lt> ColumnView<$lt, $column> {
            /// Value at row `row`
            pub fn get(&self, row: usize) -> Result<$item> {
                let $pos = self.position(row)?;
                let $col: &$lt $column = self.column;
                Ok($read)
            }

            /// Values in row order
            pub fn iter(&self) -> impl Iterator<Item = $item> + $lt {
                let $col: &$lt $column = self.column;
                let index: &$lt RowIndex = self.index;
                index.iter().map(move |$pos| $read)
            }

            pub fn to_vec(&self) -> Vec<$item> {
                self.iter().collect()
            }
        }
    };
}

impl_view!('a, Int64Column, i64, |col, pos| col.values()[pos as usize]);
impl_view!('a, Float64Column, f64, |col, pos| col.values()[pos as usize]);
impl_view!('a, BooleanColumn, bool, |col, pos| col.values()[pos as usize]);
impl_view!('a, StringColumn, Option<&'a str>, |col, pos| col.get(pos as usize));
impl_view!('a, EnumColumn, Option<&'a str>, |col, pos| col.get(pos as usize));

fn wrong_type(expected: ColumnType, found: &Column) -> Error {
    Error::type_mismatch(expected, format!("{:?} column", found.column_type()))
}

impl Frame {
    pub fn int_view(&self, name: &str) -> Result<IntView<'_>> {
        let column = self.column_ref(name)?;
        let column = column
            .as_int64()
            .ok_or_else(|| wrong_type(ColumnType::Int64, column))?;
        Ok(ColumnView {
            column,
            index: self.index(),
        })
    }

    pub fn float_view(&self, name: &str) -> Result<FloatView<'_>> {
        let column = self.column_ref(name)?;
        let column = column
            .as_float64()
            .ok_or_else(|| wrong_type(ColumnType::Float64, column))?;
        Ok(ColumnView {
            column,
            index: self.index(),
        })
    }

    pub fn bool_view(&self, name: &str) -> Result<BoolView<'_>> {
        let column = self.column_ref(name)?;
        let column = column
            .as_boolean()
            .ok_or_else(|| wrong_type(ColumnType::Boolean, column))?;
        Ok(ColumnView {
            column,
            index: self.index(),
        })
    }

    pub fn string_view(&self, name: &str) -> Result<StringView<'_>> {
        let column = self.column_ref(name)?;
        let column = column
            .as_string()
            .ok_or_else(|| wrong_type(ColumnType::String, column))?;
        Ok(ColumnView {
            column,
            index: self.index(),
        })
    }

    pub fn enum_view(&self, name: &str) -> Result<EnumView<'_>> {
        let column = self.column_ref(name)?;
        let column = column
            .as_enum()
            .ok_or_else(|| wrong_type(ColumnType::Enum, column))?;
        Ok(ColumnView {
            column,
            index: self.index(),
        })
    }
}
