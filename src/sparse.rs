use std::cmp;
use std::iter::Copied;
use std::slice;

use crate::error::{Error, Result};
use crate::item::{is_special_row, lookup_row, RowItem};
use crate::row_set::{RowProbe, RowSet};

/// A short unsorted list of rows. Every operation probes the other operand
/// once per row of this list, so it is only used for small sets.
#[derive(Clone, Debug)]
pub struct SparseRowSet {
    rows: Vec<u32>,
    lowest: u32,
    highest: u32,
}

impl Default for SparseRowSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseRowSet {
    pub fn new() -> Self {
        Self {
            rows: vec![],
            lowest: u32::MAX,
            highest: 0,
        }
    }

    pub fn add(&mut self, row: u32) -> Result<()> {
        if self.contains(row) {
            return Err(Error::DuplicateRow(row));
        }
        self.push(row);
        Ok(())
    }

    fn push(&mut self, row: u32) {
        self.rows.push(row);
        self.lowest = cmp::min(self.lowest, row);
        self.highest = cmp::max(self.highest, row);
    }

    pub fn contains(&self, row: u32) -> bool {
        self.rows.contains(&row)
    }

    pub fn min(&self) -> u32 {
        self.lowest
    }

    pub fn max(&self) -> u32 {
        self.highest
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_bitmap_backed(&self) -> bool {
        false
    }

    /// The result keeps this set's row order and is always sparse.
    pub fn intersect_with<P: RowProbe + ?Sized>(&self, other: &P) -> RowSet {
        let mut result = SparseRowSet::new();
        if !self.is_disjoint(other) {
            for &row in &self.rows {
                if other.contains(row) {
                    result.push(row);
                }
            }
        }
        RowSet::Sparse(result)
    }

    pub fn is_support_row_present<P: RowProbe + ?Sized>(&self, other: &P) -> bool {
        if self.is_disjoint(other) {
            return false;
        }
        let mut count = 0;
        for &row in &self.rows {
            if other.contains(row) {
                count += 1;
                if count > 1 {
                    return false;
                }
            }
        }
        count == 1
    }

    pub fn contains_special_row<I, R>(&self, items: &[I], reference: &I, rows: &[R]) -> bool
    where
        I: RowItem,
        R: AsRef<[i32]>,
    {
        self.iter().any(|row| match lookup_row(rows, row) {
            Some(row) => is_special_row(items, reference, row),
            None => false,
        })
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> Copied<slice::Iter<'_, u32>> {
        self.rows.iter().copied()
    }
}
