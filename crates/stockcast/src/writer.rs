//! Appending derived rows with operator feedback

use std::io::Write;

use stockcast_core::{ProductRow, RowKind};
use stockcast_store::TableStore;

use crate::error::Result;

/// Append `row` to `table`, telling the operator before and after.
///
/// Store failures are returned untouched; nothing is retried.
pub fn update_table<S, K, W>(store: &S, table: &str, row: &ProductRow<K>, out: &mut W) -> Result<()>
where
    S: TableStore + ?Sized,
    K: RowKind,
    W: Write,
{
    writeln!(out, "Updating {} worksheet...", table)?;
    store.append_row(table, row.as_slice())?;
    tracing::info!(
        backend = store.backend_name(),
        table,
        kind = row.kind_name(),
        row = %row,
        "appended row"
    );
    writeln!(out, "{} worksheet updated successfully.\n", table)?;
    Ok(())
}
