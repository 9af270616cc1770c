//! Sheets v4 client and its `TableStore` implementation.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use stockcast_store::{StoreError, StoreResult, TableStore};

use crate::a1::{column_range, sheet_range};
use crate::credentials::{ServiceAccountKey, TokenSource};
use crate::error::{Result, SheetsError};
use crate::protocol::{error_message, AppendResponse, FileList, ValueRange};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/";
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3/";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// How to find the spreadsheet holding the tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    /// Spreadsheet ID from its URL
    Id(String),
    /// Spreadsheet title, looked up through Drive
    Name(String),
}

/// Configuration for the Sheets store.
pub struct SheetsConfig {
    /// Path to the service-account key file.
    pub credentials_path: PathBuf,

    /// The spreadsheet to open.
    pub spreadsheet: SpreadsheetRef,

    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,

    /// Base URL of the Sheets API.
    pub sheets_api_base: String,

    /// Base URL of the Drive API.
    pub drive_api_base: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("creds.json"),
            spreadsheet: SpreadsheetRef::Name("love_sandwiches".to_string()),
            timeout: None,
            sheets_api_base: SHEETS_API_BASE.to_string(),
            drive_api_base: DRIVE_API_BASE.to_string(),
        }
    }
}

/// A spreadsheet used as a set of tables, one worksheet per table.
///
/// The token cache sits behind a mutex so the store can be used through
/// `&self`, as [`TableStore`] requires.
pub struct SheetsStore {
    http: Client,
    tokens: Mutex<TokenSource>,
    spreadsheet_id: String,
    sheets_base: Url,
}

impl SheetsStore {
    /// Load credentials, authorize and locate the spreadsheet.
    pub fn connect(config: SheetsConfig) -> Result<Self> {
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;
        tracing::info!(
            account = %key.client_email,
            path = %config.credentials_path.display(),
            "loaded service-account credentials"
        );

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let sheets_base = parse_base(&config.sheets_api_base)?;
        let mut tokens = TokenSource::new(key);

        let spreadsheet_id = match config.spreadsheet {
            SpreadsheetRef::Id(id) => id,
            SpreadsheetRef::Name(name) => {
                let drive_base = parse_base(&config.drive_api_base)?;
                let token = tokens.token(&http)?;
                find_spreadsheet(&http, &drive_base, &token, &name)?
            }
        };
        tracing::info!(spreadsheet = %spreadsheet_id, "opened spreadsheet");

        Ok(Self {
            http,
            tokens: Mutex::new(tokens),
            spreadsheet_id,
            sheets_base,
        })
    }

    /// ID of the open spreadsheet
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn token(&self) -> Result<String> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.token(&self.http)
    }

    /// Read a range as strings
    pub fn get_values(&self, range: &str, major_dimension: &str) -> Result<Vec<Vec<String>>> {
        let mut url = values_url(&self.sheets_base, &self.spreadsheet_id, range)?;
        url.query_pairs_mut()
            .append_pair("majorDimension", major_dimension);

        let resp = self.http.get(url).bearer_auth(self.token()?).send()?;
        let body: ValueRange = check(resp, range)?.json()?;
        Ok(body.into_strings())
    }

    /// Append one row after the last row of a worksheet
    pub fn append_values(&self, title: &str, row: &[i64]) -> Result<()> {
        let range = sheet_range(title);
        let mut url = values_url(
            &self.sheets_base,
            &self.spreadsheet_id,
            &format!("{}:append", range),
        )?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.token()?)
            .json(&ValueRange::single_row(row))
            .send()?;
        let body: AppendResponse = check(resp, &range)?.json()?;

        if let Some(updates) = body.updates {
            tracing::debug!(
                range = updates.updated_range.as_deref().unwrap_or(""),
                cells = updates.updated_cells.unwrap_or(0),
                "sheet updated"
            );
        }
        Ok(())
    }
}

impl TableStore for SheetsStore {
    fn backend_name(&self) -> &'static str {
        "sheets"
    }

    fn append_row(&self, table: &str, row: &[i64]) -> StoreResult<()> {
        self.append_values(table, row)
            .map_err(|e| into_store_error(e, table))
    }

    fn get_all_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        self.get_values(&sheet_range(table), "ROWS")
            .map_err(|e| into_store_error(e, table))
    }

    fn get_column(&self, table: &str, index: usize) -> StoreResult<Vec<String>> {
        let mut columns = self
            .get_values(&column_range(table, index), "COLUMNS")
            .map_err(|e| into_store_error(e, table))?;
        let mut column = if columns.is_empty() {
            Vec::new()
        } else {
            columns.swap_remove(0)
        };
        while column.last().is_some_and(|cell| cell.is_empty()) {
            column.pop();
        }
        Ok(column)
    }
}

fn parse_base(base: &str) -> Result<Url> {
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).map_err(|e| SheetsError::Url(format!("{}: {}", base, e)))
}

/// `{base}spreadsheets/{id}/values/{range}` with each part percent-encoded
pub(crate) fn values_url(base: &Url, spreadsheet_id: &str, range: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SheetsError::Url(base.to_string()))?
        .pop_if_empty()
        .extend(["spreadsheets", spreadsheet_id, "values", range]);
    Ok(url)
}

pub(crate) fn drive_search_url(base: &Url, name: &str) -> Result<Url> {
    let mut url = base
        .join("files")
        .map_err(|e| SheetsError::Url(e.to_string()))?;
    let query = format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        name.replace('\\', "\\\\").replace('\'', "\\'"),
        SPREADSHEET_MIME
    );
    url.query_pairs_mut()
        .append_pair("q", &query)
        .append_pair("fields", "files(id,name)")
        .append_pair("supportsAllDrives", "true")
        .append_pair("includeItemsFromAllDrives", "true");
    Ok(url)
}

fn find_spreadsheet(http: &Client, drive_base: &Url, token: &str, name: &str) -> Result<String> {
    let url = drive_search_url(drive_base, name)?;
    let resp = http.get(url).bearer_auth(token).send()?;
    let list: FileList = check(resp, name)?.json()?;

    if list.files.len() > 1 {
        tracing::warn!(name, count = list.files.len(), "several spreadsheets share this name, using the first");
    }
    list.files
        .into_iter()
        .next()
        .map(|file| file.id)
        .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
}

/// Turn a non-2xx response into an error
fn check(resp: Response, range: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().unwrap_or_default();
    let message = error_message(&body);
    if status == reqwest::StatusCode::BAD_REQUEST && message.starts_with("Unable to parse range") {
        return Err(SheetsError::WorksheetNotFound(range.to_string()));
    }
    Err(SheetsError::Api {
        status: status.as_u16(),
        message,
    })
}

fn into_store_error(error: SheetsError, table: &str) -> StoreError {
    match error {
        SheetsError::WorksheetNotFound(_) => StoreError::TableNotFound(table.to_string()),
        other => StoreError::backend("sheets", other),
    }
}
