//! Row filtering
//!
//! A [`Filter`] is either a single clause, comparing one column against a constant
//! or against another column, or an `And`/`Or`/`Not` combination of filters. Each
//! clause is evaluated by the column itself into a [`BitMask`] aligned with the
//! frame's [`RowIndex`]; combinations merge those masks.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// Comparison operator of a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    /// Whether a comparison outcome satisfies this comparator
    #[inline]
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            Comparator::Eq => ordering == Ordering::Equal,
            Comparator::Neq => ordering != Ordering::Equal,
            Comparator::Lt => ordering == Ordering::Less,
            Comparator::Lte => ordering != Ordering::Greater,
            Comparator::Gt => ordering == Ordering::Greater,
            Comparator::Gte => ordering != Ordering::Less,
        }
    }

    /// `lt`, `lte`, `gt` and `gte` need an order, `eq` and `neq` only equality
    #[inline]
    pub fn is_ordering(self) -> bool {
        !matches!(self, Comparator::Eq | Comparator::Neq)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Neq => "!=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "=" | "==" | "eq" => Ok(Comparator::Eq),
            "!=" | "<>" | "neq" => Ok(Comparator::Neq),
            "<" | "lt" => Ok(Comparator::Lt),
            "<=" | "lte" => Ok(Comparator::Lte),
            ">" | "gt" => Ok(Comparator::Gt),
            ">=" | "gte" => Ok(Comparator::Gte),
            other => Err(Error::InvalidOperand(format!(
                "unknown comparator '{}'",
                other
            ))),
        }
    }
}

/// Right-hand side of a filter clause
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Constant compared against every row
    Value(Value),
    /// Another column of the same frame, compared row by row
    Column(String),
}

/// Row predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Clause {
        column: String,
        comparator: Comparator,
        operand: Operand,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Compare `column` against a constant
    pub fn new(column: impl Into<String>, comparator: Comparator, value: impl Into<Value>) -> Self {
        Filter::Clause {
            column: column.into(),
            comparator,
            operand: Operand::Value(value.into()),
        }
    }

    /// Compare `column` against `other` row by row
    pub fn columns(
        column: impl Into<String>,
        comparator: Comparator,
        other: impl Into<String>,
    ) -> Self {
        Filter::Clause {
            column: column.into(),
            comparator,
            operand: Operand::Column(other.into()),
        }
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            this => Filter::And(vec![this, other]),
        }
    }

    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            this => Filter::Or(vec![this, other]),
        }
    }

    pub fn negate(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Evaluate the filter over `index`, resolving column names with `lookup`.
    ///
    /// Slot `k` of the returned mask refers to `index[k]`. Any error aborts the
    /// whole evaluation and no mask is returned.
    pub fn evaluate<'a, F>(&self, index: &RowIndex, lookup: &F) -> Result<BitMask>
    where
        F: Fn(&str) -> Result<&'a Column>,
    {
        match self {
            Filter::Clause {
                column,
                comparator,
                operand,
            } => {
                let col = lookup(column.as_str())?;
                let mut mask = BitMask::new(index.len());
                match operand {
                    Operand::Value(value) => col.filter_const(index, *comparator, value, &mut mask)?,
                    Operand::Column(other) => {
                        let other = lookup(other.as_str())?;
                        col.filter_column(index, *comparator, other, &mut mask)?
                    }
                }
                Ok(mask)
            }
            Filter::And(filters) => {
                let mut mask = BitMask::ones(index.len());
                for filter in filters {
                    mask.and(&filter.evaluate(index, lookup)?);
                }
                Ok(mask)
            }
            Filter::Or(filters) => {
                let mut mask = BitMask::zeros(index.len());
                for filter in filters {
                    mask.or(&filter.evaluate(index, lookup)?);
                }
                Ok(mask)
            }
            Filter::Not(filter) => {
                let mut mask = filter.evaluate(index, lookup)?;
                mask.invert();
                Ok(mask)
            }
        }
    }
}

impl std::ops::Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        self.negate()
    }
}
