/// Containment test between an item and a row of attribute codes.
pub trait RowItem {
    fn is_contained(&self, row: &[i32]) -> bool;
}

/// An (attribute, value) pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Item {
    pub column: usize,
    pub value: i32,
}

impl Item {
    pub fn new(column: usize, value: i32) -> Self {
        Self { column, value }
    }
}

impl RowItem for Item {
    fn is_contained(&self, row: &[i32]) -> bool {
        row.get(self.column) == Some(&self.value)
    }
}

/// Every item is contained in `row` and `reference` is not.
pub(crate) fn is_special_row<I: RowItem>(items: &[I], reference: &I, row: &[i32]) -> bool {
    items.iter().all(|item| item.is_contained(row)) && !reference.is_contained(row)
}

/// Looks up a 1-based row index in a 0-based table.
pub(crate) fn lookup_row<R: AsRef<[i32]>>(rows: &[R], row: u32) -> Option<&[i32]> {
    let ix = (row as usize).checked_sub(1)?;
    rows.get(ix).map(|r| r.as_ref())
}
