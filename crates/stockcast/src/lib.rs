//! # stockcast
//!
//! Record the sales of one market, work out what was left over, and project
//! how much stock to prepare for the next one.
//!
//! A run is strictly linear:
//!
//! 1. prompt until the operator enters six comma-separated counts
//! 2. append them to the `sales` table
//! 3. subtract them from the last `stock` row and append the result to
//!    `surplus`
//! 4. average the last five sales per product, scale by 1.1 and append the
//!    result to `stock`
//!
//! Storage goes through [`TableStore`]; see [`stockcast_store`] for the local
//! backends and `stockcast_gsheets` for Google Sheets.
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use stockcast::{MemoryStore, Pipeline, TableStore};
//!
//! let store = MemoryStore::new();
//! let headings = ["cheese", "ham", "turkey", "tuna", "egg", "chicken"];
//! for table in ["sales", "surplus", "stock"] {
//!     store.create_table(table, &headings).unwrap();
//! }
//! store.append_row("stock", &[10, 20, 30, 40, 50, 60]).unwrap();
//!
//! let pipeline = Pipeline::new(store);
//! let mut input = Cursor::new("5,25,20,40,45,70\n");
//! let mut output = Vec::new();
//! let report = pipeline.run(&mut input, &mut output).unwrap();
//!
//! assert_eq!(report.surplus.values(), &[5, -5, 10, 0, 5, -10]);
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use collector::{collect_sales, collect_sales_with};
pub use config::{
    BackendKind, CsvSettings, ForecastSettings, SheetsSettings, StockcastConfig, TableNames,
    DEFAULT_CONFIG_FILE,
};
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, RunReport, Stage};
pub use writer::update_table;

// Re-export core and store types
pub use stockcast_core::{
    calculate_surplus, forecast_stock, is_valid, parse_sales, validate, DeriveError,
    ForecastPolicy, ForecastRow, SalesHistoryWindow, SalesRow, StockRecommendation, StockRow,
    SurplusRow, ValidationError, PRODUCT_COUNT,
};
pub use stockcast_store::{CsvStore, MemoryStore, StoreError, StoreResult, TableStore};
