//! Error types for the Sheets backend.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Failed to read credentials file '{}': {source}", path.display())]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid credentials file: {0}")]
    CredentialsParse(#[from] serde_json::Error),

    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Token exchange failed ({status}): {message}")]
    TokenExchange { status: u16, message: String },

    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
