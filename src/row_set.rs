use std::iter::Copied;
use std::slice;

use tracing::debug;

use crate::bitset::{self, BitRowSet};
use crate::error::Result;
use crate::item::RowItem;
use crate::policy::BitmapPolicy;
use crate::sparse::SparseRowSet;

/// The read side every row set exposes to the other backing.
pub trait RowProbe {
    fn contains(&self, row: u32) -> bool;
    fn min(&self) -> u32;
    fn max(&self) -> u32;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no row can be in both sets, decided from bounds alone.
    fn is_disjoint<P: RowProbe + ?Sized>(&self, other: &P) -> bool {
        self.is_empty()
            || other.is_empty()
            || self.max() < other.min()
            || other.max() < self.min()
    }
}

/// A set of row indices, either a bitmap or a short list.
///
/// Sets are filled with `add` and then only read. Reads take `&self`, so a
/// filled set can be shared across threads as is.
#[derive(Clone, Debug)]
pub enum RowSet {
    Bitmap(BitRowSet),
    Sparse(SparseRowSet),
}

impl RowSet {
    pub fn bitmap(min_row: u32, max_row: u32) -> Result<Self> {
        Ok(RowSet::Bitmap(BitRowSet::new(min_row, max_row)?))
    }

    pub fn sparse() -> Self {
        RowSet::Sparse(SparseRowSet::new())
    }

    /// Picks the backing for `expected_rows` rows within `[min_row, max_row]`.
    pub fn with_expected(
        min_row: u32,
        max_row: u32,
        expected_rows: u32,
        policy: &BitmapPolicy,
    ) -> Result<Self> {
        let dense = policy.fits(min_row, max_row, expected_rows);
        debug!(min_row, max_row, expected_rows, dense, "choosing row set backing");
        if dense {
            Self::bitmap(min_row, max_row)
        } else {
            Ok(Self::sparse())
        }
    }

    pub fn add(&mut self, row: u32) -> Result<()> {
        match self {
            RowSet::Bitmap(s) => s.add(row),
            RowSet::Sparse(s) => s.add(row),
        }
    }

    pub fn contains(&self, row: u32) -> bool {
        match self {
            RowSet::Bitmap(s) => s.contains(row),
            RowSet::Sparse(s) => s.contains(row),
        }
    }

    pub fn intersect_with(&self, other: &RowSet) -> RowSet {
        match self {
            RowSet::Bitmap(s) => s.intersect_with(other),
            RowSet::Sparse(s) => s.intersect_with(other),
        }
    }

    pub fn is_support_row_present(&self, other: &RowSet) -> bool {
        match self {
            RowSet::Bitmap(s) => s.is_support_row_present(other),
            RowSet::Sparse(s) => s.is_support_row_present(other),
        }
    }

    /// See [`BitRowSet::contains_special_row`] for the row numbering.
    pub fn contains_special_row<I, R>(&self, items: &[I], reference: &I, rows: &[R]) -> bool
    where
        I: RowItem,
        R: AsRef<[i32]>,
    {
        match self {
            RowSet::Bitmap(s) => s.contains_special_row(items, reference, rows),
            RowSet::Sparse(s) => s.contains_special_row(items, reference, rows),
        }
    }

    pub fn min(&self) -> u32 {
        match self {
            RowSet::Bitmap(s) => s.min(),
            RowSet::Sparse(s) => s.min(),
        }
    }

    pub fn max(&self) -> u32 {
        match self {
            RowSet::Bitmap(s) => s.max(),
            RowSet::Sparse(s) => s.max(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RowSet::Bitmap(s) => s.len(),
            RowSet::Sparse(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_bitmap_backed(&self) -> bool {
        match self {
            RowSet::Bitmap(s) => s.is_bitmap_backed(),
            RowSet::Sparse(s) => s.is_bitmap_backed(),
        }
    }

    /// Ascending for bitmaps, insertion order for lists.
    pub fn iter(&self) -> Iter<'_> {
        match self {
            RowSet::Bitmap(s) => Iter::Bitmap(s.iter()),
            RowSet::Sparse(s) => Iter::Sparse(s.iter()),
        }
    }
}

impl From<BitRowSet> for RowSet {
    fn from(s: BitRowSet) -> Self {
        RowSet::Bitmap(s)
    }
}

impl From<SparseRowSet> for RowSet {
    fn from(s: SparseRowSet) -> Self {
        RowSet::Sparse(s)
    }
}

pub enum Iter<'a> {
    Bitmap(bitset::Rows<'a>),
    Sparse(Copied<slice::Iter<'a, u32>>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            Iter::Bitmap(it) => it.next(),
            Iter::Sparse(it) => it.next(),
        }
    }
}

impl RowProbe for BitRowSet {
    fn contains(&self, row: u32) -> bool {
        BitRowSet::contains(self, row)
    }
    fn min(&self) -> u32 {
        BitRowSet::min(self)
    }
    fn max(&self) -> u32 {
        BitRowSet::max(self)
    }
    fn len(&self) -> usize {
        BitRowSet::len(self)
    }
}

impl RowProbe for SparseRowSet {
    fn contains(&self, row: u32) -> bool {
        SparseRowSet::contains(self, row)
    }
    fn min(&self) -> u32 {
        SparseRowSet::min(self)
    }
    fn max(&self) -> u32 {
        SparseRowSet::max(self)
    }
    fn len(&self) -> usize {
        SparseRowSet::len(self)
    }
}

impl RowProbe for RowSet {
    fn contains(&self, row: u32) -> bool {
        RowSet::contains(self, row)
    }
    fn min(&self) -> u32 {
        RowSet::min(self)
    }
    fn max(&self) -> u32 {
        RowSet::max(self)
    }
    fn len(&self) -> usize {
        RowSet::len(self)
    }
}
