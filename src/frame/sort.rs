use std::cmp::Ordering;

use crate::column::Comparable;
use crate::error::Result;

use super::Frame;

/// Sort order for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub reverse: bool,
}

impl SortKey {
    /// Ascending order
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reverse: false,
        }
    }

    /// Descending order
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reverse: true,
        }
    }
}

impl From<&str> for SortKey {
    fn from(column: &str) -> Self {
        SortKey::asc(column)
    }
}

impl Frame {
    /// Rows ordered by `keys`, the first key most significant.
    ///
    /// The sort is stable: rows comparing equal on every key keep their current
    /// relative order. Nulls sort first and NaN sorts last in ascending order.
    pub fn sort(&self, keys: &[SortKey]) -> Result<Frame> {
        let columns = keys
            .iter()
            .map(|key| Ok((self.column_ref(&key.column)?, key.reverse)))
            .collect::<Result<Vec<_>>>()?;

        let mut positions = self.index().as_slice().to_vec();
        positions.sort_by(|&a, &b| {
            for &(column, reverse) in &columns {
                let ordering = column.compare(a, b);
                let ordering = if reverse {
                    ordering.reverse()
                } else {
                    ordering
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        Ok(self.with_index(positions.into()))
    }
}
