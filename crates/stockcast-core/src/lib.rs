//! # stockcast-core
//!
//! Core types and arithmetic for the stockcast sales pipeline.
//!
//! This crate has no I/O. It provides:
//! - [`ProductRow`] and its aliases [`SalesRow`], [`StockRow`], [`SurplusRow`],
//!   [`ForecastRow`] - fixed-width rows, one value per product
//! - [`validate`] - turns raw operator tokens into a [`SalesRow`]
//! - [`calculate_surplus`] and [`forecast_stock`] - the derivations
//!
//! ## Example
//!
//! ```rust
//! use stockcast_core::{calculate_surplus, parse_sales, StockRow};
//!
//! let sales = parse_sales("5,25,20,40,45,70").unwrap();
//! let stock = StockRow::new([10, 20, 30, 40, 50, 60]);
//!
//! let surplus = calculate_surplus(&stock, &sales).unwrap();
//! assert_eq!(surplus.values(), &[5, -5, 10, 0, 5, -10]);
//! ```

pub mod derive;
pub mod error;
pub mod recommendation;
pub mod row;
pub mod validation;

pub use derive::{
    calculate_surplus, forecast_stock, forecast_value, last_data_row, parse_cell, parse_row,
    ForecastPolicy, SalesHistoryWindow,
};
pub use error::{DeriveError, Error, Result, ValidationError};
pub use recommendation::StockRecommendation;
pub use row::{
    Forecast, ForecastRow, ProductRow, RowKind, Sales, SalesRow, Stock, StockRow, Surplus,
    SurplusRow,
};
pub use validation::{is_valid, parse_sales, split_input, validate};

/// Number of product types tracked in every row
pub const PRODUCT_COUNT: usize = 6;

/// Default number of trailing sales entries used by the forecast
pub const DEFAULT_WINDOW: usize = 5;

/// Default multiplier applied to the windowed average
pub const DEFAULT_FACTOR: f64 = 1.1;
