//! # stockcast-store
//!
//! The named-table interface the stockcast pipeline writes through, plus two
//! local backends:
//! - [`MemoryStore`] - tables held in memory
//! - [`CsvStore`] - one `<table>.csv` file per table in a directory
//!
//! Remote backends (Google Sheets) live in their own crates and implement
//! [`TableStore`] the same way.

mod csv_store;
mod error;
mod memory;
mod options;
mod table;

pub use csv_store::CsvStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use options::{CsvStoreOptions, LineTerminator};
pub use table::{column_of, TableStore};
