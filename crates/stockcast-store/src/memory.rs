//! In-memory table store

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{StoreError, StoreResult};
use crate::table::{column_of, TableStore};

/// Tables held in memory.
///
/// Tables must be created before rows can be appended, like worksheets in a
/// spreadsheet.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, BTreeMap<String, Vec<Vec<String>>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a table whose first row holds `headings`.
    ///
    /// An empty `headings` slice creates a table with no header row.
    pub fn create_table<S: AsRef<str>>(&self, name: &str, headings: &[S]) -> StoreResult<()> {
        let mut tables = self.tables();
        if tables.contains_key(name) {
            return Err(StoreError::TableExists(name.to_string()));
        }
        let rows = if headings.is_empty() {
            Vec::new()
        } else {
            vec![headings.iter().map(|h| h.as_ref().to_string()).collect()]
        };
        tables.insert(name.to_string(), rows);
        Ok(())
    }

    /// Append raw string cells, bypassing the integer-only append
    pub fn push_raw_row<S: AsRef<str>>(&self, name: &str, cells: &[S]) -> StoreResult<()> {
        let mut tables = self.tables();
        let rows = tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        rows.push(cells.iter().map(|c| c.as_ref().to_string()).collect());
        Ok(())
    }

    /// Names of all tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        self.tables().keys().cloned().collect()
    }

    /// Number of rows in a table, header included
    pub fn row_count(&self, name: &str) -> StoreResult<usize> {
        self.tables()
            .get(name)
            .map(Vec::len)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }
}

impl TableStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn append_row(&self, table: &str, row: &[i64]) -> StoreResult<()> {
        let mut tables = self.tables();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        rows.push(row.iter().map(i64::to_string).collect());
        tracing::debug!(table, rows = rows.len(), "appended row in memory");
        Ok(())
    }

    fn get_all_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        self.tables()
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    fn get_column(&self, table: &str, index: usize) -> StoreResult<Vec<String>> {
        let tables = self.tables();
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(column_of(rows, index))
    }
}
