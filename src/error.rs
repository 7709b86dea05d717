use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    #[error("Invalid row range: max {max} is below min {min}")]
    InvalidRange { min: u32, max: u32 },

    #[error("Row {row} outside of bitmap range [{first}, {last}]")]
    OutOfRange { row: u32, first: u32, last: u64 },

    /// The row is already present. Rejected so `len()` stays exact.
    #[error("Row {0} added twice")]
    DuplicateRow(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
