//! Configuration file (`stockcast.toml`)
//!
//! Every field has a default, so a missing file or an empty one gives the
//! stock setup: Google Sheets backend, `love_sandwiches` spreadsheet,
//! `creds.json` credentials, tables `sales`/`stock`/`surplus`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stockcast_core::{ForecastPolicy, PRODUCT_COUNT};
use stockcast_store::{CsvStore, TableStore};

use crate::error::{PipelineError, Result};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "stockcast.toml";

/// Which table store to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Google Sheets spreadsheet
    Sheets,
    /// Directory of CSV files
    Csv,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StockcastConfig {
    pub backend: BackendKind,
    /// First row of every table holds product headings
    pub has_header: bool,
    /// Headings written by `init`
    pub products: Vec<String>,
    pub tables: TableNames,
    pub forecast: ForecastSettings,
    pub csv: CsvSettings,
    pub sheets: SheetsSettings,
}

impl Default for StockcastConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sheets,
            has_header: true,
            products: ["cheese", "ham", "turkey", "tuna", "egg", "chicken"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tables: TableNames::default(),
            forecast: ForecastSettings::default(),
            csv: CsvSettings::default(),
            sheets: SheetsSettings::default(),
        }
    }
}

/// Names of the three tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableNames {
    pub sales: String,
    pub stock: String,
    pub surplus: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            sales: "sales".to_string(),
            stock: "stock".to_string(),
            surplus: "surplus".to_string(),
        }
    }
}

impl TableNames {
    /// All table names, in pipeline order
    pub fn all(&self) -> [&str; 3] {
        [&self.sales, &self.surplus, &self.stock]
    }
}

/// Forecast window and multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastSettings {
    pub window: usize,
    pub factor: f64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        let policy = ForecastPolicy::default();
        Self {
            window: policy.window,
            factor: policy.factor,
        }
    }
}

impl From<ForecastSettings> for ForecastPolicy {
    fn from(settings: ForecastSettings) -> Self {
        ForecastPolicy {
            window: settings.window,
            factor: settings.factor,
        }
    }
}

/// CSV backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvSettings {
    pub data_dir: PathBuf,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Google Sheets backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetsSettings {
    pub credentials: PathBuf,
    /// Takes precedence over `spreadsheet_name`
    pub spreadsheet_id: Option<String>,
    pub spreadsheet_name: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("creds.json"),
            spreadsheet_id: None,
            spreadsheet_name: "love_sandwiches".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl StockcastConfig {
    /// Parse config from TOML text
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let config: StockcastConfig =
            toml::from_str(text).map_err(|source| PipelineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.check()?;
        Ok(config)
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load config from a file, or return defaults if it doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Reject settings the pipeline cannot run with
    pub fn check(&self) -> Result<()> {
        ForecastPolicy::from(self.forecast)
            .check()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.products.len() != PRODUCT_COUNT {
            return Err(PipelineError::Config(format!(
                "products must name exactly {} products, got {}",
                PRODUCT_COUNT,
                self.products.len()
            )));
        }

        let names = self.tables.all();
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(PipelineError::Config("table names cannot be empty".into()));
        }
        if names[0] == names[1] || names[1] == names[2] || names[0] == names[2] {
            return Err(PipelineError::Config(format!(
                "table names must differ, got {:?}",
                names
            )));
        }
        Ok(())
    }

    /// Forecast policy built from the settings
    pub fn forecast_policy(&self) -> ForecastPolicy {
        self.forecast.into()
    }

    /// Open the CSV store described by this config
    pub fn csv_store(&self) -> CsvStore {
        CsvStore::new(&self.csv.data_dir)
    }

    /// Google Sheets connection settings
    #[cfg(feature = "sheets")]
    pub fn sheets_config(&self) -> stockcast_gsheets::SheetsConfig {
        use stockcast_gsheets::{SheetsConfig, SpreadsheetRef};

        let spreadsheet = match &self.sheets.spreadsheet_id {
            Some(id) => SpreadsheetRef::Id(id.clone()),
            None => SpreadsheetRef::Name(self.sheets.spreadsheet_name.clone()),
        };
        SheetsConfig {
            credentials_path: self.sheets.credentials.clone(),
            spreadsheet,
            timeout: self
                .sheets
                .request_timeout_secs
                .map(std::time::Duration::from_secs),
            ..SheetsConfig::default()
        }
    }

    /// Open the configured backend
    pub fn open_store(&self) -> Result<Box<dyn TableStore>> {
        match self.backend {
            BackendKind::Csv => {
                tracing::info!(dir = %self.csv.data_dir.display(), "using csv store");
                Ok(Box::new(self.csv_store()))
            }
            #[cfg(feature = "sheets")]
            BackendKind::Sheets => {
                let store = stockcast_gsheets::SheetsStore::connect(self.sheets_config())?;
                Ok(Box::new(store))
            }
            #[cfg(not(feature = "sheets"))]
            BackendKind::Sheets => Err(PipelineError::Config(
                "built without the `sheets` feature".into(),
            )),
        }
    }
}
