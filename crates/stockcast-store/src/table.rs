//! The table store trait

use crate::error::StoreResult;

/// A set of named, append-ordered tables.
///
/// Mirrors the handful of worksheet calls the pipeline needs. Cell values come
/// back as strings, exactly as the backend stores them; parsing is up to the
/// caller. Methods take `&self` so one handle can be shared by every stage.
pub trait TableStore {
    /// Short backend name, used in logs
    fn backend_name(&self) -> &'static str;

    /// Append `row` as the new last row of `table`
    fn append_row(&self, table: &str, row: &[i64]) -> StoreResult<()>;

    /// Read every row of `table`, header row included
    fn get_all_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>>;

    /// Read column `index` (0-based) of `table`, header row included.
    ///
    /// Trailing empty cells are dropped.
    fn get_column(&self, table: &str, index: usize) -> StoreResult<Vec<String>>;

    /// Read the last row of `table`, if any
    fn last_row(&self, table: &str) -> StoreResult<Option<Vec<String>>> {
        Ok(self.get_all_rows(table)?.pop())
    }
}

impl<T: TableStore + ?Sized> TableStore for &T {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn append_row(&self, table: &str, row: &[i64]) -> StoreResult<()> {
        (**self).append_row(table, row)
    }

    fn get_all_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        (**self).get_all_rows(table)
    }

    fn get_column(&self, table: &str, index: usize) -> StoreResult<Vec<String>> {
        (**self).get_column(table, index)
    }

    fn last_row(&self, table: &str) -> StoreResult<Option<Vec<String>>> {
        (**self).last_row(table)
    }
}

impl<T: TableStore + ?Sized> TableStore for Box<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn append_row(&self, table: &str, row: &[i64]) -> StoreResult<()> {
        (**self).append_row(table, row)
    }

    fn get_all_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        (**self).get_all_rows(table)
    }

    fn get_column(&self, table: &str, index: usize) -> StoreResult<Vec<String>> {
        (**self).get_column(table, index)
    }

    fn last_row(&self, table: &str) -> StoreResult<Option<Vec<String>>> {
        (**self).last_row(table)
    }
}

/// Extract column `index` from row-major data, padding ragged rows with empty
/// cells and dropping trailing empties
pub fn column_of(rows: &[Vec<String>], index: usize) -> Vec<String> {
    let mut column: Vec<String> = rows
        .iter()
        .map(|row| row.get(index).cloned().unwrap_or_default())
        .collect();
    while column.last().is_some_and(|cell| cell.is_empty()) {
        column.pop();
    }
    column
}
