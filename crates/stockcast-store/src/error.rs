//! Store error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or appending table rows
#[derive(Debug, Error)]
pub enum StoreError {
    /// No table with this name
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Table already exists
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Name cannot be used as a table
    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error raised by a backend crate
    #[error("{backend} error: {source}")]
    Backend {
        backend: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a backend-specific error
    pub fn backend<E>(backend: &'static str, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend {
            backend,
            source: Box::new(error),
        }
    }
}
