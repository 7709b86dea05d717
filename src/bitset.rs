use std::cmp;
use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};
use crate::item::{is_special_row, lookup_row, RowItem};
use crate::policy::BitmapPolicy;
use crate::row_set::{RowProbe, RowSet};
use crate::sparse::SparseRowSet;

const WORD_BITS: u32 = 64;
const WORD_SHIFT: u32 = 6;
const BIT_MASK: u32 = WORD_BITS - 1;

/// A set of row indices stored as a bitmap over a fixed window.
///
/// Bit 0 of `words[0]` is row `base`, and `base` is always a multiple of 64.
/// Two sets with different bases therefore share a word grid and can be
/// intersected word by word after skipping whole words, never by shifting.
///
/// `lowest` and `highest` bound the rows in the set but are not necessarily
/// tight: intersection results take the overlap of their operands' bounds.
#[derive(Clone)]
pub struct BitRowSet {
    words: Box<[u64]>,
    base: u32,
    len: usize,
    lowest: u32,
    highest: u32,
}

impl BitRowSet {
    /// Whether a bitmap over `[min_row, max_row]` is dense enough for
    /// `expected_rows` rows under the default policy.
    pub fn fits_as_bitmap(min_row: u32, max_row: u32, expected_rows: u32) -> bool {
        BitmapPolicy::default().fits(min_row, max_row, expected_rows)
    }

    pub fn new(min_row: u32, max_row: u32) -> Result<Self> {
        if max_row < min_row {
            return Err(Error::InvalidRange {
                min: min_row,
                max: max_row,
            });
        }
        Ok(Self::with_range(min_row, max_row))
    }

    fn with_range(min_row: u32, max_row: u32) -> Self {
        debug_assert!(min_row <= max_row);
        let base = min_row & !BIT_MASK;
        let num_words = ((max_row - base) >> WORD_SHIFT) as usize + 1;
        trace!(min_row, max_row, base, num_words, "allocating row bitmap");
        Self {
            words: vec![0; num_words].into_boxed_slice(),
            base,
            len: 0,
            lowest: u32::MAX,
            highest: 0,
        }
    }

    pub fn base_offset(&self) -> u32 {
        self.base
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Last row addressable by this bitmap.
    pub fn last_row(&self) -> u64 {
        u64::from(self.base) + u64::from(WORD_BITS) * self.words.len() as u64 - 1
    }

    fn base_word(&self) -> usize {
        (self.base >> WORD_SHIFT) as usize
    }

    // Words starting at the global word index `origin`, empty if past the end.
    fn words_from(&self, origin: usize) -> &[u64] {
        debug_assert!(origin >= self.base_word());
        self.words.get(origin - self.base_word()..).unwrap_or(&[])
    }

    fn locate(&self, row: u32) -> Option<(usize, u64)> {
        let rel = row.checked_sub(self.base)?;
        let word = (rel >> WORD_SHIFT) as usize;
        if word >= self.words.len() {
            return None;
        }
        Some((word, 1 << (rel & BIT_MASK)))
    }

    pub fn add(&mut self, row: u32) -> Result<()> {
        let (word, mask) = self.locate(row).ok_or(Error::OutOfRange {
            row,
            first: self.base,
            last: self.last_row(),
        })?;
        if self.words[word] & mask != 0 {
            return Err(Error::DuplicateRow(row));
        }
        self.words[word] |= mask;
        self.lowest = cmp::min(self.lowest, row);
        self.highest = cmp::max(self.highest, row);
        self.len += 1;
        Ok(())
    }

    pub fn contains(&self, row: u32) -> bool {
        match self.locate(row) {
            Some((word, mask)) => self.words[word] & mask != 0,
            None => false,
        }
    }

    pub fn min(&self) -> u32 {
        self.lowest
    }

    pub fn max(&self) -> u32 {
        self.highest
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_bitmap_backed(&self) -> bool {
        true
    }

    pub fn intersect_with(&self, other: &RowSet) -> RowSet {
        if self.is_disjoint(other) {
            trace!("row ranges disjoint, skipping intersection");
            return RowSet::Sparse(SparseRowSet::new());
        }
        match other {
            RowSet::Bitmap(other) => RowSet::Bitmap(self.and(other)),
            RowSet::Sparse(other) => {
                trace!(rows = other.len(), "sparse operand probes bitmap");
                other.intersect_with(self)
            }
        }
    }

    // Word-wise AND of two overlapping bitmaps.
    fn and(&self, other: &BitRowSet) -> BitRowSet {
        let lowest = cmp::max(self.lowest, other.lowest);
        let highest = cmp::min(self.highest, other.highest);

        let mut result = BitRowSet::with_range(lowest, highest);
        // Approximate bounds: the overlap of both operands, not the surviving bits.
        result.lowest = lowest;
        result.highest = highest;

        let origin = cmp::max(
            result.base_word(),
            cmp::max(self.base_word(), other.base_word()),
        );
        let start = origin - result.base_word();
        let lhs = self.words_from(origin);
        let rhs = other.words_from(origin);

        let mut len = 0;
        if let Some(out) = result.words.get_mut(start..) {
            for (out, (a, b)) in out.iter_mut().zip(lhs.iter().zip(rhs)) {
                let word = a & b;
                len += word.count_ones() as usize;
                *out = word;
            }
        }
        result.len = len;
        result
    }

    /// Whether exactly one row is present in both sets.
    pub fn is_support_row_present(&self, other: &RowSet) -> bool {
        if self.is_disjoint(other) {
            return false;
        }
        match other {
            RowSet::Bitmap(other) => {
                let origin = cmp::max(self.base_word(), other.base_word());
                let mut count = 0;
                for (a, b) in self.words_from(origin).iter().zip(other.words_from(origin)) {
                    count += (a & b).count_ones();
                    if count > 1 {
                        return false;
                    }
                }
                count == 1
            }
            RowSet::Sparse(other) => other.is_support_row_present(self),
        }
    }

    /// Whether some row in the set contains every item of `items` but not
    /// `reference`. Rows are 1-based: row `r` is checked against `rows[r - 1]`.
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

    /// Rows in ascending order.
    pub fn iter(&self) -> Rows<'_> {
        Rows {
            words: &self.words,
            word: 0,
            current: self.words.first().copied().unwrap_or(0),
            base: self.base,
        }
    }
}

impl fmt::Debug for BitRowSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BitRowSet")
            .field("size", &self.len)
            .field("offset", &self.base)
            .field("min", &self.lowest)
            .field("max", &self.highest)
            .field("words", &self.words)
            .finish()
    }
}

pub struct Rows<'a> {
    words: &'a [u64],
    word: usize,
    current: u64,
    base: u32,
}

impl<'a> Iterator for Rows<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros();
                self.current &= self.current - 1;
                let row = u64::from(self.base) + (self.word as u64) * u64::from(WORD_BITS) + u64::from(bit);
                return Some(row as u32);
            }
            self.word += 1;
            self.current = *self.words.get(self.word)?;
        }
    }
}
