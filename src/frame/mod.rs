//! Frame: named columns sharing one row index
//!
//! A [`Frame`] never changes after construction. Filtering, sorting, selecting and
//! grouping all build a new frame (or a [`Grouper`]) that shares the column storage
//! of its parent and only owns a new [`RowIndex`].

mod grouper;
mod sort;
mod view;

use std::collections::HashMap;
use std::fmt;

pub use grouper::Grouper;
pub use sort::SortKey;
pub use view::{BoolView, ColumnView, EnumView, FloatView, IntView, StringView};

use crate::column::{Column, ColumnType};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::grouper::{self as grouping, GroupConfig};
use crate::index::RowIndex;
use crate::value::Value;

/// Immutable, column oriented table
#[derive(Clone, Debug)]
pub struct Frame {
    // column data (shared storage)
    columns: Vec<Column>,
    // name -> position
    column_indices: HashMap<String, usize>,
    // column order
    column_names: Vec<String>,
    // row positions
    index: RowIndex,
}

impl Frame {
    /// Build a frame from `(name, column)` pairs, in column order.
    ///
    /// All columns must have the same length and names must be unique.
    pub fn new<I, S, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<Column>,
    {
        let mut frame = Frame {
            columns: Vec::new(),
            column_indices: HashMap::new(),
            column_names: Vec::new(),
            index: RowIndex::empty(),
        };
        let mut row_count: Option<usize> = None;

        for (name, column) in columns {
            let name = name.into();
            let column = column.into();

            if frame.column_indices.contains_key(&name) {
                return Err(Error::Construction(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }

            match row_count {
                Some(expected) if expected != column.len() => {
                    return Err(Error::Construction(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        column.len(),
                        expected
                    )))
                }
                Some(_) => {}
                None => row_count = Some(column.len()),
            }

            frame.column_indices.insert(name.clone(), frame.columns.len());
            frame.column_names.push(name);
            frame.columns.push(column);
        }

        let rows = row_count.unwrap_or(0);
        let rows = u32::try_from(rows).map_err(|_| {
            Error::Construction(format!("{} rows exceed the supported row count", rows))
        })?;
        frame.index = RowIndex::ascending(rows);
        log::trace!(
            "constructed frame with {} rows and {} columns",
            rows,
            frame.columns.len()
        );
        Ok(frame)
    }

    /// Same columns, different rows
    pub(crate) fn with_index(&self, index: RowIndex) -> Frame {
        Frame {
            columns: self.columns.clone(),
            column_indices: self.column_indices.clone(),
            column_names: self.column_names.clone(),
            index,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        Ok(self.column_ref(name)?.column_type())
    }

    /// Row positions of this frame into the shared column storage
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Unindexed storage of a column; positions must come from [`Frame::index`]
    pub(crate) fn column_ref(&self, name: &str) -> Result<&Column> {
        self.column_indices
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    pub(crate) fn column_refs(&self, names: &[&str]) -> Result<Vec<&Column>> {
        names.iter().map(|name| self.column_ref(name)).collect()
    }

    /// A column materialised in row order
    pub fn column(&self, name: &str) -> Result<Column> {
        Ok(self.column_ref(name)?.subset(&self.index))
    }

    /// Value of `column` at row `row`
    pub fn value(&self, column: &str, row: usize) -> Result<Value> {
        let col = self.column_ref(column)?;
        let pos = self.index.get(row).ok_or(Error::IndexOutOfBounds {
            index: row,
            size: self.index.len(),
        })?;
        Ok(col.value_at(pos))
    }

    /// Rows for which `filter` holds, in their current order
    pub fn filter(&self, filter: &Filter) -> Result<Frame> {
        let mask = filter.evaluate(&self.index, &|name: &str| self.column_ref(name))?;
        let index = self.index.filter(&mask);
        log::trace!("filter kept {} of {} rows", index.len(), self.len());
        Ok(self.with_index(index))
    }

    /// Frame with only `columns`, in the given order
    pub fn select(&self, columns: &[&str]) -> Result<Frame> {
        let mut selected = Vec::with_capacity(columns.len());
        let mut column_indices = HashMap::with_capacity(columns.len());
        let mut column_names = Vec::with_capacity(columns.len());
        for &name in columns {
            let column = self.column_ref(name)?;
            if column_indices
                .insert(name.to_string(), selected.len())
                .is_some()
            {
                return Err(Error::Construction(format!(
                    "column '{}' selected more than once",
                    name
                )));
            }
            column_names.push(name.to_string());
            selected.push(column.clone());
        }
        Ok(Frame {
            columns: selected,
            column_indices,
            column_names,
            index: self.index.clone(),
        })
    }

    /// One row per distinct combination of `columns`, all columns when empty.
    ///
    /// The first row of every combination is kept. Row order of the result is not
    /// defined.
    pub fn distinct(&self, columns: &[&str]) -> Result<Frame> {
        let names: Vec<&str> = if columns.is_empty() {
            self.column_names.iter().map(String::as_str).collect()
        } else {
            columns.to_vec()
        };
        let key_columns = self.column_refs(&names)?;
        let index = grouping::distinct(&self.index, &key_columns);
        Ok(self.with_index(index))
    }

    /// Group rows by equal values of `columns`
    pub fn group_by(&self, columns: &[&str]) -> Result<Grouper> {
        self.group_by_with(columns, &GroupConfig::default())
    }

    /// [`Frame::group_by`] with explicit table sizing
    pub fn group_by_with(&self, columns: &[&str], config: &GroupConfig) -> Result<Grouper> {
        let key_columns = self.column_refs(columns)?;
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(Error::Construction(format!(
                    "column '{}' grouped more than once",
                    name
                )));
            }
        }
        let (groups, stats) = grouping::group_by_with_config(&self.index, &key_columns, config);
        Ok(Grouper::new(
            self.clone(),
            columns.iter().map(|c| c.to_string()).collect(),
            groups,
            stats,
        ))
    }

    /// Same column names, types and values in the same row order
    pub fn equals(&self, other: &Frame) -> bool {
        self.column_names == other.column_names
            && self.len() == other.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|(a, b)| a.equals(&self.index, b, &other.index))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // maximum rows displayed
        const MAX_ROWS: usize = 10;

        if self.columns.is_empty() {
            return write!(f, "Frame (0 rows x 0 columns)");
        }

        writeln!(
            f,
            "Frame ({} rows x {} columns):",
            self.len(),
            self.columns.len()
        )?;

        write!(f, "{:<5} |", "idx")?;
        for name in &self.column_names {
            write!(f, " {:<15} |", name)?;
        }
        writeln!(f)?;

        write!(f, "{:-<5}-+", "")?;
        for _ in &self.column_names {
            write!(f, "-{:-<15}-+", "")?;
        }
        writeln!(f)?;

        for (row, pos) in self.index.iter().take(MAX_ROWS).enumerate() {
            write!(f, "{:<5} |", row)?;
            for column in &self.columns {
                write!(f, " {:<15} |", column.string_at(pos, "null"))?;
            }
            writeln!(f)?;
        }

        if self.len() > MAX_ROWS {
            writeln!(f, "... ({} more rows)", self.len() - MAX_ROWS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Comparator;

    fn sample() -> Frame {
        Frame::new(vec![
            ("id", Column::from(vec![1i64, 2, 3, 4])),
            ("name", Column::from(vec!["a", "b", "c", "d"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_unequal_lengths() {
        let err = Frame::new(vec![
            ("a", Column::from(vec![1i64, 2])),
            ("b", Column::from(vec![1i64])),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let err = Frame::new(vec![
            ("a", Column::from(vec![1i64])),
            ("a", Column::from(vec![2i64])),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[test]
    fn test_filter_shares_storage() {
        let frame = sample();
        let filtered = frame
            .filter(&Filter::new("id", Comparator::Gt, 2))
            .unwrap();
        assert_eq!(filtered.index().as_slice(), &[2, 3]);
        assert_eq!(filtered.value("name", 0).unwrap(), Value::from("c"));
        assert_eq!(frame.len(), 4);
    }

    #[test]
    fn test_select_and_unknown_column() {
        let frame = sample();
        let selected = frame.select(&["name"]).unwrap();
        assert_eq!(selected.column_names(), &["name".to_string()]);
        assert!(matches!(
            frame.select(&["nope"]),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_group_by_rejects_repeated_column() {
        let frame = sample();
        assert!(matches!(
            frame.group_by(&["id", "id"]),
            Err(Error::Construction(_))
        ));
        assert!(matches!(
            frame.group_by(&["nope", "nope"]),
            Err(Error::UnknownColumn(_))
        ));
        assert_eq!(frame.group_by(&["id", "name"]).unwrap().len(), 4);
    }

    #[test]
    fn test_value_out_of_bounds() {
        let frame = sample();
        assert!(matches!(
            frame.value("id", 4),
            Err(Error::IndexOutOfBounds { index: 4, size: 4 })
        ));
    }

    #[test]
    fn test_display_truncates() {
        let frame = Frame::new(vec![("n", Column::from((0..12).collect::<Vec<i64>>()))]).unwrap();
        let text = frame.to_string();
        assert!(text.starts_with("Frame (12 rows x 1 columns):"));
        assert!(text.contains("... (2 more rows)"));
    }

    #[test]
    fn test_equals_ignores_storage_layout() {
        let frame = sample();
        let filtered = frame
            .filter(&Filter::new("id", Comparator::Gte, 3))
            .unwrap();
        let direct = Frame::new(vec![
            ("id", Column::from(vec![3i64, 4])),
            ("name", Column::from(vec!["c", "d"])),
        ])
        .unwrap();
        assert!(filtered.equals(&direct));
        assert!(!frame.equals(&direct));
    }
}
