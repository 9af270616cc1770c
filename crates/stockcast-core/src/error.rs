//! Error types for stockcast-core

use std::num::ParseIntError;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stockcast-core
#[derive(Debug, Error)]
pub enum Error {
    /// Operator input was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Stored rows could not be turned into a derivation
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

/// Reasons a line of sales input is rejected.
///
/// The `Display` text is what the operator sees after `Invalid data: `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A token is not an integer
    #[error("invalid literal for integer: '{token}' ({source})")]
    InvalidInteger {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// Token count differs from the number of products
    #[error("Exactly {expected} values required, you provided {actual}")]
    WrongCount { expected: usize, actual: usize },

    /// Sales counts are never negative
    #[error("Sales figures cannot be negative, got {0}")]
    Negative(i64),
}

/// Errors raised while reading stored rows for a derivation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeriveError {
    /// Table (or column) has no data rows
    #[error("table '{table}' has no data rows")]
    EmptyTable { table: String },

    /// Row width does not match the product count
    #[error("row {row} of table '{table}' has {actual} values, expected {expected}")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A stored cell is not an integer
    #[error("cell at row {row}, column {column} of table '{table}' is not an integer: '{value}'")]
    InvalidCell {
        table: String,
        row: usize,
        column: usize,
        value: String,
    },

    /// A derived value does not fit in an `i64`
    #[error("surplus for product {product} is out of range")]
    Overflow { product: usize },

    /// Forecast parameters are unusable
    #[error("invalid forecast policy: {0}")]
    InvalidPolicy(String),
}
