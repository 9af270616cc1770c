//! Google Sheets backend for the stockcast table store.
//!
//! Each table is a worksheet of one spreadsheet. Requests go to the Sheets v4
//! REST API over a blocking HTTP client, authorized with an access token
//! obtained from a service-account key.
//!
//! # Architecture
//!
//! ```text
//! Pipeline (stockcast)
//!     └── SheetsStore: TableStore (this crate)
//!           ├── TokenSource: signed JWT -> OAuth token endpoint
//!           └── Sheets v4: values.get / values.append
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use stockcast_gsheets::{SheetsConfig, SheetsStore, SpreadsheetRef};
//! use stockcast_store::TableStore;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SheetsConfig {
//!         spreadsheet: SpreadsheetRef::Name("love_sandwiches".into()),
//!         ..SheetsConfig::default()
//!     };
//!     let store = SheetsStore::connect(config)?;
//!     store.append_row("sales", &[10, 20, 30, 40, 50, 60])?;
//!     println!("{:?}", store.last_row("stock")?);
//!     Ok(())
//! }
//! ```

mod a1;
mod client;
mod credentials;
mod error;
mod protocol;

pub use a1::{column_range, column_to_letters, sheet_range};
pub use client::{SheetsConfig, SheetsStore, SpreadsheetRef};
pub use credentials::{AccessToken, ServiceAccountKey, TokenSource, SCOPES};
pub use error::{Result, SheetsError};
