//! Pipeline error types

use std::path::PathBuf;

use stockcast_core::DeriveError;
use stockcast_store::StoreError;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that end a pipeline run.
///
/// Rejected operator input is not among them: the collector re-prompts.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Terminal I/O failed, or input ended before valid data was entered
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The table store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Stored rows could not be used
    #[error("Derivation error: {0}")]
    Derive(#[from] DeriveError),

    /// Config file could not be read
    #[error("Failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this program
    #[error("Invalid config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config values are inconsistent
    #[error("Invalid config: {0}")]
    Config(String),

    /// The Sheets backend could not connect
    #[cfg(feature = "sheets")]
    #[error("Sheets error: {0}")]
    Sheets(#[from] stockcast_gsheets::SheetsError),
}
