//! Row index sets for minimal unique detection over tabular data.
//!
//! A [`RowSet`] is either a word-aligned bitmap ([`BitRowSet`]) or a short
//! list ([`SparseRowSet`]). Both support intersection, an "exactly one shared
//! row" test and a scan for rows matching a combination of [`Item`]s.

mod bitset;
mod error;
mod item;
mod policy;
mod row_set;
mod sparse;

#[cfg(test)]
mod qc_tests;

pub use bitset::{BitRowSet, Rows};
pub use error::{Error, Result};
pub use item::{Item, RowItem};
pub use policy::BitmapPolicy;
pub use row_set::{Iter, RowProbe, RowSet};
pub use sparse::SparseRowSet;
