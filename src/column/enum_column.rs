use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::aggregate::{AggregateFn, CustomAggregation};
use crate::column::common::{
    combine_hashes, compare_nullable, filter_null_operand, group_counts, hash_value,
    mark_matches, nullable_matches, ColumnOps, ColumnType, Comparable, NULL_HASH,
};
use crate::column::Column;
use crate::error::{Error, Result};
use crate::filter::Comparator;
use crate::index::{BitMask, RowIndex};
use crate::value::Value;

/// Code stored for null cells
const NULL_CODE: u32 = u32::MAX;

/// Category dictionary shared by every column derived from the same enum
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Categories {
    names: Vec<String>,
    ordered: bool,
}

/// Categorical column: each cell is a code into a shared list of category names.
///
/// An enum built from an explicit category list is ordered by that list and
/// supports ordering comparators. An enum whose categories are inferred from the
/// data is unordered; codes still give grouping and sorting a total order.
#[derive(Debug, Clone)]
pub struct EnumColumn {
    pub(crate) codes: Arc<[u32]>,
    pub(crate) categories: Arc<Categories>,
}

impl EnumColumn {
    /// Build an enum column.
    ///
    /// With `categories` the enum is ordered and every non-null value must be one of
    /// them. Without, categories are collected in first-seen order.
    pub fn new<S: AsRef<str>>(
        values: Vec<Option<S>>,
        categories: Option<Vec<String>>,
    ) -> Result<Self> {
        let ordered = categories.is_some();
        let mut names = categories.unwrap_or_default();
        let mut lookup: HashMap<String, u32> = HashMap::with_capacity(names.len());
        for (code, name) in names.iter().enumerate() {
            if lookup.insert(name.clone(), code as u32).is_some() {
                return Err(Error::Construction(format!(
                    "duplicate enum category '{}'",
                    name
                )));
            }
        }

        let mut codes = Vec::with_capacity(values.len());
        for value in &values {
            let code = match value {
                None => NULL_CODE,
                Some(v) => match lookup.get(v.as_ref()) {
                    Some(&code) => code,
                    None if ordered => {
                        return Err(Error::Construction(format!(
                            "value '{}' is not a valid enum category",
                            v.as_ref()
                        )))
                    }
                    None => {
                        let code = names.len() as u32;
                        names.push(v.as_ref().to_string());
                        lookup.insert(v.as_ref().to_string(), code);
                        code
                    }
                },
            };
            codes.push(code);
        }

        if names.len() >= NULL_CODE as usize {
            return Err(Error::Construction(format!(
                "too many enum categories: {}",
                names.len()
            )));
        }

        Ok(Self {
            codes: codes.into(),
            categories: Arc::new(Categories { names, ordered }),
        })
    }

    /// Category name at storage position `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.codes
            .get(index)
            .and_then(|&code| self.category_name(code))
    }

    pub fn categories(&self) -> &[String] {
        &self.categories.names
    }

    pub fn is_ordered(&self) -> bool {
        self.categories.ordered
    }

    #[inline]
    fn code(&self, pos: u32) -> Option<u32> {
        match self.codes[pos as usize] {
            NULL_CODE => None,
            code => Some(code),
        }
    }

    #[inline]
    fn category_name(&self, code: u32) -> Option<&str> {
        if code == NULL_CODE {
            None
        } else {
            self.categories.names.get(code as usize).map(String::as_str)
        }
    }

    fn same_categories(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.categories, &other.categories) || self.categories == other.categories
    }

    fn check_comparator(&self, comparator: Comparator) -> Result<()> {
        if comparator.is_ordering() && !self.is_ordered() {
            return Err(Error::unsupported(
                format!("filter {} on unordered enum", comparator),
                ColumnType::Enum,
            ));
        }
        Ok(())
    }

    fn with_codes(&self, codes: Vec<u32>) -> Self {
        Self {
            codes: codes.into(),
            categories: Arc::clone(&self.categories),
        }
    }

    fn extreme(&self, group: &RowIndex, wanted: Ordering) -> u32 {
        group
            .iter()
            .filter_map(|pos| self.code(pos))
            .reduce(|acc, c| if c.cmp(&acc) == wanted { c } else { acc })
            .unwrap_or(NULL_CODE)
    }
}

impl Comparable for EnumColumn {
    #[inline]
    fn compare(&self, i: u32, j: u32) -> Ordering {
        compare_nullable(self.code(i), self.code(j), |a, b| a.cmp(b))
    }

    #[inline]
    fn hash(&self, i: u32, seed: u64) -> u64 {
        match self.code(i) {
            Some(code) => combine_hashes(seed, hash_value(&code)),
            None => combine_hashes(seed, NULL_HASH),
        }
    }
}

impl ColumnOps for EnumColumn {
    fn column_type(&self) -> ColumnType {
        ColumnType::Enum
    }

    fn len(&self) -> usize {
        self.codes.len()
    }

    fn subset(&self, index: &RowIndex) -> Self {
        self.with_codes(index.iter().map(|pos| self.codes[pos as usize]).collect())
    }

    fn filter_const(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        operand: &Value,
        mask: &mut BitMask,
    ) -> Result<()> {
        self.check_comparator(comparator)?;
        let name = match operand {
            Value::Str(name) => name,
            Value::Null => {
                return filter_null_operand(index, comparator, mask, |pos| {
                    self.code(pos).is_none()
                })
            }
            other => return Err(Error::type_mismatch(ColumnType::Enum, other.type_name())),
        };

        let target = self.categories.names.iter().position(|n| n == name);
        match (target, comparator) {
            (Some(target), _) => {
                let target = target as u32;
                mark_matches(index, mask, |pos| {
                    nullable_matches(comparator, self.code(pos), Some(target), |a, b| a.cmp(b))
                });
            }
            (None, Comparator::Eq) => {}
            (None, Comparator::Neq) => mark_matches(index, mask, |_| true),
            (None, _) => {
                return Err(Error::InvalidOperand(format!(
                    "unknown enum category '{}'",
                    name
                )))
            }
        }
        Ok(())
    }

    fn filter_column(
        &self,
        index: &RowIndex,
        comparator: Comparator,
        other: &Self,
        mask: &mut BitMask,
    ) -> Result<()> {
        self.check_comparator(comparator)?;
        if !self.same_categories(other) {
            return Err(Error::type_mismatch(
                ColumnType::Enum,
                "enum with different categories",
            ));
        }
        mark_matches(index, mask, |pos| {
            nullable_matches(comparator, self.code(pos), other.code(pos), |a, b| a.cmp(b))
        });
        Ok(())
    }

    fn aggregate(&self, groups: &[RowIndex], func: &AggregateFn) -> Result<Column> {
        let column = match func {
            AggregateFn::Min | AggregateFn::Max if self.is_ordered() => {
                let wanted = if matches!(func, AggregateFn::Min) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
                Column::Enum(
                    self.with_codes(groups.iter().map(|g| self.extreme(g, wanted)).collect()),
                )
            }
            AggregateFn::Count => group_counts(groups),
            AggregateFn::Custom(CustomAggregation::Str(f)) => {
                let lookup: HashMap<&str, u32> = self
                    .categories
                    .names
                    .iter()
                    .enumerate()
                    .map(|(code, name)| (name.as_str(), code as u32))
                    .collect();
                let mut codes = Vec::with_capacity(groups.len());
                for group in groups {
                    let cells: Vec<Option<&str>> = group
                        .iter()
                        .map(|pos| self.code(pos).and_then(|c| self.category_name(c)))
                        .collect();
                    let code = match f(&cells) {
                        None => NULL_CODE,
                        Some(name) => match lookup.get(name.as_str()) {
                            Some(code) => *code,
                            None => {
                                return Err(Error::InvalidOperand(format!(
                                    "aggregation produced unknown enum category '{}'",
                                    name
                                )))
                            }
                        },
                    };
                    codes.push(code);
                }
                Column::Enum(self.with_codes(codes))
            }
            AggregateFn::Custom(custom) => {
                return Err(Error::type_mismatch(ColumnType::Enum, custom.element_type()))
            }
            other => {
                return Err(Error::unsupported(
                    format!("aggregate {}", other.name()),
                    ColumnType::Enum,
                ))
            }
        };
        Ok(column)
    }

    fn append(&self, others: &[&Self]) -> Result<Self> {
        let mut codes = self.codes.to_vec();
        for other in others {
            if !self.same_categories(other) {
                return Err(Error::type_mismatch(
                    ColumnType::Enum,
                    "enum with different categories",
                ));
            }
            codes.extend_from_slice(&other.codes);
        }
        Ok(self.with_codes(codes))
    }

    fn string_at(&self, i: u32, na_rep: &str) -> String {
        self.code(i)
            .and_then(|c| self.category_name(c))
            .unwrap_or(na_rep)
            .to_string()
    }

    fn value_at(&self, i: u32) -> Value {
        match self.code(i).and_then(|c| self.category_name(c)) {
            Some(name) => Value::Str(name.to_string()),
            None => Value::Null,
        }
    }
}
