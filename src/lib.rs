//! Immutable, column oriented tables with filtering, grouping and aggregation.
//!
//! A [`Frame`] is a set of named, typed [`Column`]s viewed through a [`RowIndex`].
//! Filtering, sorting and grouping never copy or modify column data: they produce
//! new indices over the same shared storage.
//!
//! ```
//! use qframe::{Aggregation, AggregateFn, Column, Comparator, Filter, Frame};
//!
//! let frame = Frame::new(vec![
//!     ("a", Column::from(vec![1i64, 2, 3, 1])),
//!     ("b", Column::from(vec![1i64, 3, 2, 5])),
//! ])?;
//!
//! let counts = frame
//!     .filter(&Filter::new("b", Comparator::Gt, 1))?
//!     .group_by(&["a"])?
//!     .aggregate(&[Aggregation::new(AggregateFn::Count, "b")])?;
//! assert_eq!(counts.len(), 3);
//! # Ok::<(), qframe::Error>(())
//! ```

pub mod aggregate;
pub mod column;
pub mod error;
pub mod filter;
pub mod frame;
pub mod grouper;
pub mod index;
pub mod io;
pub mod value;

pub use aggregate::{AggregateFn, Aggregation, CustomAggregation};
pub use column::{
    BooleanColumn, Column, ColumnOps, ColumnType, Comparable, EnumColumn, Float64Column,
    Int64Column, StringColumn,
};
pub use error::{Error, Result};
pub use filter::{Comparator, Filter, Operand};
pub use frame::{Frame, Grouper, SortKey};
pub use grouper::{GroupConfig, GroupStats};
pub use index::{BitMask, RowIndex};
pub use value::Value;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
