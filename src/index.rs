//! Row position indices and selection masks
//!
//! A [`RowIndex`] is an ordered list of row positions into column storage. Every
//! operation that filters or reorders rows produces a new `RowIndex`; column data
//! is never touched, so many frames can share the same columns through different
//! indices.

use std::fmt;
use std::ops::Index;

/// Ordered sequence of row positions into column storage
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct RowIndex {
    positions: Vec<u32>,
}

impl RowIndex {
    /// Create an index from raw positions
    pub fn new(positions: Vec<u32>) -> Self {
        Self { positions }
    }

    /// Identity index `[0, n)`
    pub fn ascending(n: u32) -> Self {
        Self {
            positions: (0..n).collect(),
        }
    }

    /// Empty index
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position stored at slot `k`
    pub fn get(&self, k: usize) -> Option<u32> {
        self.positions.get(k).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.positions
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, u32>> {
        self.positions.iter().copied()
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.positions
    }

    /// Compose two indices: the result holds `self[other[k]]` for every `k`.
    ///
    /// `other` addresses slots of `self`, not column storage, which is how nested
    /// views are built without copying column data.
    ///
    /// # Panics
    /// Panics if `other` contains a slot outside `self`.
    pub fn subset(&self, other: &RowIndex) -> RowIndex {
        RowIndex {
            positions: other.iter().map(|k| self.positions[k as usize]).collect(),
        }
    }

    /// Keep the positions whose slot is set in `mask`.
    ///
    /// # Panics
    /// Panics if the mask length differs from the index length.
    pub fn filter(&self, mask: &BitMask) -> RowIndex {
        assert_eq!(
            mask.len(),
            self.len(),
            "selection mask length must match index length"
        );
        RowIndex {
            positions: self
                .positions
                .iter()
                .enumerate()
                .filter(|(k, _)| mask.get(*k))
                .map(|(_, &pos)| pos)
                .collect(),
        }
    }

    /// Largest position in the index, if any
    pub fn max_position(&self) -> Option<u32> {
        self.positions.iter().copied().max()
    }
}

impl Index<usize> for RowIndex {
    type Output = u32;

    fn index(&self, k: usize) -> &u32 {
        &self.positions[k]
    }
}

impl From<Vec<u32>> for RowIndex {
    fn from(positions: Vec<u32>) -> Self {
        Self::new(positions)
    }
}

impl FromIterator<u32> for RowIndex {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RowIndex {
    type Item = u32;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (k, pos) in self.positions.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pos)?;
        }
        write!(f, "]")
    }
}

/// Bit set aligned with the slots of a [`RowIndex`]
///
/// Bits start cleared and are only ever set for confirmed matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    data: Vec<u8>,
    len: usize,
}

impl BitMask {
    /// All bits cleared
    pub fn new(length: usize) -> Self {
        let bytes_needed = (length + 7) / 8;
        Self {
            data: vec![0u8; bytes_needed],
            len: length,
        }
    }

    pub fn zeros(length: usize) -> Self {
        Self::new(length)
    }

    /// All bits set
    pub fn ones(length: usize) -> Self {
        let mut mask = Self::new(length);
        for byte in mask.data.iter_mut() {
            *byte = 0xFF;
        }
        mask.clear_tail();
        mask
    }

    pub fn from_bools(bools: &[bool]) -> Self {
        let mut mask = Self::new(bools.len());
        for (i, &is_set) in bools.iter().enumerate() {
            if is_set {
                mask.set(i);
            }
        }
        mask
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len);
        (self.data[index / 8] & (1 << (index % 8))) != 0
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.data[index / 8] |= 1 << (index % 8);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Bitwise AND in place
    pub fn and(&mut self, other: &BitMask) {
        assert_eq!(self.len, other.len, "mask lengths differ");
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a &= *b;
        }
    }

    /// Bitwise OR in place
    pub fn or(&mut self, other: &BitMask) {
        assert_eq!(self.len, other.len, "mask lengths differ");
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a |= *b;
        }
    }

    /// Bitwise NOT in place
    pub fn invert(&mut self) {
        for byte in self.data.iter_mut() {
            *byte = !*byte;
        }
        self.clear_tail();
    }

    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.len).map(|i| self.get(i)).collect()
    }

    fn clear_tail(&mut self) {
        let remaining_bits = self.len % 8;
        if remaining_bits != 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= (1u8 << remaining_bits) - 1;
            }
        }
    }
}
