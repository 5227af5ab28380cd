//! Aggregation functions and aggregation specs

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Signature of a custom string aggregation. Null cells are passed as `None`;
/// returning `None` produces a null result cell.
pub type StrAggregation = dyn Fn(&[Option<&str>]) -> Option<String> + Send + Sync;

/// A user-supplied reduction over the values of one group.
///
/// The variant fixes the element type the closure accepts; applying it to a column
/// of another type is a [`Error::TypeMismatch`]. Enum columns use `Str`, and the
/// returned name must be one of the enum's categories.
#[derive(Clone)]
pub enum CustomAggregation {
    Int(Arc<dyn Fn(&[i64]) -> i64 + Send + Sync>),
    Float(Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>),
    Bool(Arc<dyn Fn(&[bool]) -> bool + Send + Sync>),
    Str(Arc<StrAggregation>),
}

impl CustomAggregation {
    /// Element type the closure expects, used in error messages
    pub fn element_type(&self) -> &'static str {
        match self {
            CustomAggregation::Int(_) => "int aggregation",
            CustomAggregation::Float(_) => "float aggregation",
            CustomAggregation::Bool(_) => "bool aggregation",
            CustomAggregation::Str(_) => "string aggregation",
        }
    }
}

impl fmt::Debug for CustomAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomAggregation({})", self.element_type())
    }
}

/// Reduction applied to every group of a column
#[derive(Debug, Clone)]
pub enum AggregateFn {
    Sum,
    Mean,
    Min,
    Max,
    /// Number of rows in the group, defined for every column type
    Count,
    Custom(CustomAggregation),
}

impl AggregateFn {
    pub fn int<F>(f: F) -> Self
    where
        F: Fn(&[i64]) -> i64 + Send + Sync + 'static,
    {
        AggregateFn::Custom(CustomAggregation::Int(Arc::new(f)))
    }

    pub fn float<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        AggregateFn::Custom(CustomAggregation::Float(Arc::new(f)))
    }

    pub fn bool<F>(f: F) -> Self
    where
        F: Fn(&[bool]) -> bool + Send + Sync + 'static,
    {
        AggregateFn::Custom(CustomAggregation::Bool(Arc::new(f)))
    }

    pub fn string<F>(f: F) -> Self
    where
        F: Fn(&[Option<&str>]) -> Option<String> + Send + Sync + 'static,
    {
        AggregateFn::Custom(CustomAggregation::Str(Arc::new(f)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "sum",
            AggregateFn::Mean => "mean",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Count => "count",
            AggregateFn::Custom(_) => "custom",
        }
    }

    pub fn is_count(&self) -> bool {
        matches!(self, AggregateFn::Count)
    }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateFn {
    type Err = Error;

    /// Parse one of the built-in function names
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregateFn::Sum),
            "mean" | "avg" => Ok(AggregateFn::Mean),
            "min" => Ok(AggregateFn::Min),
            "max" => Ok(AggregateFn::Max),
            "count" => Ok(AggregateFn::Count),
            _ => Err(Error::InvalidOperand(format!(
                "unknown aggregation function '{}'",
                s
            ))),
        }
    }
}

/// One reduction of a grouped frame: a function, its source column and the name
/// of the result column.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub func: AggregateFn,
    pub column: String,
    pub name: Option<String>,
}

impl Aggregation {
    pub fn new(func: AggregateFn, column: impl Into<String>) -> Self {
        Self {
            func,
            column: column.into(),
            name: None,
        }
    }

    /// Store the result under `name` instead of the source column name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name of the result column
    pub fn destination(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.column)
    }
}
