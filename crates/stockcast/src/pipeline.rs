//! The per-run pipeline: collect, record, derive, record.

use std::fmt;
use std::io::{BufRead, Write};

use stockcast_core::{
    calculate_surplus, forecast_stock, last_data_row, ForecastPolicy, ForecastRow,
    SalesHistoryWindow, SalesRow, StockRecommendation, StockRow, SurplusRow, PRODUCT_COUNT,
};
use stockcast_store::TableStore;

use crate::collector::collect_sales_with;
use crate::config::{StockcastConfig, TableNames};
use crate::error::Result;
use crate::writer::update_table;

/// Where a run currently is.
///
/// A run moves `AwaitingInput -> Validating`, back to `AwaitingInput` on a
/// rejected line, then `Writing -> Deriving -> Writing -> Forecasting ->
/// Writing -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingInput,
    Validating,
    Writing,
    Deriving,
    Forecasting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AwaitingInput => "awaiting-input",
            Stage::Validating => "validating",
            Stage::Writing => "writing",
            Stage::Deriving => "deriving",
            Stage::Forecasting => "forecasting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub sales: SalesRow,
    pub surplus: SurplusRow,
    pub forecast: ForecastRow,
    pub recommendation: StockRecommendation,
}

/// Run context: the store handle and the settings every stage needs.
///
/// Built once per process and passed by reference to each stage.
pub struct Pipeline<S> {
    store: S,
    tables: TableNames,
    policy: ForecastPolicy,
    has_header: bool,
}

impl<S: TableStore> Pipeline<S> {
    /// Create a pipeline with default table names and forecast policy
    pub fn new(store: S) -> Self {
        Self {
            store,
            tables: TableNames::default(),
            policy: ForecastPolicy::default(),
            has_header: true,
        }
    }

    /// Create a pipeline from a loaded config
    pub fn from_config(store: S, config: &StockcastConfig) -> Self {
        Self {
            store,
            tables: config.tables.clone(),
            policy: config.forecast_policy(),
            has_header: config.has_header,
        }
    }

    /// Override the table names
    pub fn with_tables(mut self, tables: TableNames) -> Self {
        self.tables = tables;
        self
    }

    /// Override the forecast policy
    pub fn with_policy(mut self, policy: ForecastPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set whether tables start with a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The table names in use
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    fn enter(&self, stage: Stage) {
        tracing::debug!(%stage, backend = self.store.backend_name(), "pipeline stage");
    }

    /// Append validated sales to the sales table
    pub fn record_sales<W: Write>(&self, sales: &SalesRow, out: &mut W) -> Result<()> {
        self.enter(Stage::Writing);
        update_table(&self.store, &self.tables.sales, sales, out)
    }

    /// Compare sales against the last stock row
    pub fn calculate_surplus<W: Write>(&self, sales: &SalesRow, out: &mut W) -> Result<SurplusRow> {
        self.enter(Stage::Deriving);
        writeln!(out, "Calculating surplus data...\n")?;

        let rows = self.store.get_all_rows(&self.tables.stock)?;
        let stock: StockRow = last_data_row(&self.tables.stock, &rows, self.has_header)?;
        let surplus = calculate_surplus(&stock, sales)?;
        tracing::debug!(%stock, %sales, %surplus, "surplus calculated");
        Ok(surplus)
    }

    /// Append the surplus row
    pub fn record_surplus<W: Write>(&self, surplus: &SurplusRow, out: &mut W) -> Result<()> {
        self.enter(Stage::Writing);
        update_table(&self.store, &self.tables.surplus, surplus, out)
    }

    /// Read the trailing sales window for every product
    pub fn sales_window(&self) -> Result<SalesHistoryWindow> {
        let mut columns = Vec::with_capacity(PRODUCT_COUNT);
        for index in 0..PRODUCT_COUNT {
            columns.push(self.store.get_column(&self.tables.sales, index)?);
        }
        Ok(SalesHistoryWindow::from_columns(
            &self.tables.sales,
            &columns,
            self.has_header,
            self.policy.window,
        )?)
    }

    /// Project the next stock baseline from recent sales
    pub fn forecast_stock<W: Write>(&self, out: &mut W) -> Result<ForecastRow> {
        self.enter(Stage::Forecasting);
        writeln!(out, "Calculating stock data...\n")?;

        let window = self.sales_window()?;
        let forecast = forecast_stock(&self.tables.sales, &window, &self.policy)?;
        tracing::debug!(%forecast, window = self.policy.window, "stock forecast calculated");
        Ok(forecast)
    }

    /// Append the forecast to the stock table
    pub fn record_stock<W: Write>(&self, forecast: &ForecastRow, out: &mut W) -> Result<()> {
        self.enter(Stage::Writing);
        update_table(&self.store, &self.tables.stock, forecast, out)
    }

    /// Label the forecast with the stock table's headings
    pub fn recommendation(&self, forecast: &ForecastRow) -> Result<StockRecommendation> {
        let headings = if self.has_header {
            self.store
                .get_all_rows(&self.tables.stock)?
                .into_iter()
                .next()
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        Ok(StockRecommendation::new(&headings, forecast))
    }

    /// Record sales that were already collected and run every derivation
    pub fn process<W: Write>(&self, sales: SalesRow, out: &mut W) -> Result<RunReport> {
        self.record_sales(&sales, out)?;

        let surplus = self.calculate_surplus(&sales, out)?;
        self.record_surplus(&surplus, out)?;

        let forecast = self.forecast_stock(out)?;
        self.record_stock(&forecast, out)?;

        let recommendation = self.recommendation(&forecast)?;
        writeln!(out, "Make the following numbers of sandwiches for next market:\n")?;
        writeln!(out, "{}", recommendation)?;

        self.enter(Stage::Done);
        Ok(RunReport {
            sales,
            surplus,
            forecast,
            recommendation,
        })
    }

    /// One full run: prompt for sales, then [`process`](Self::process) them
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<RunReport> {
        let sales = collect_sales_with(input, out, |stage| self.enter(stage))?;
        self.process(sales, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcast_store::MemoryStore;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::AwaitingInput.to_string(), "awaiting-input");
        assert_eq!(Stage::Validating.to_string(), "validating");
        assert_eq!(Stage::Done.to_string(), "done");
    }

    #[test]
    fn test_builders() {
        let tables = TableNames {
            sales: "s".into(),
            stock: "k".into(),
            surplus: "p".into(),
        };
        let pipeline = Pipeline::new(MemoryStore::new())
            .with_tables(tables.clone())
            .with_policy(ForecastPolicy {
                window: 3,
                factor: 1.0,
            })
            .with_header(false);
        assert_eq!(pipeline.tables(), &tables);
        assert_eq!(pipeline.policy.window, 3);
        assert!(!pipeline.has_header);
        assert!(pipeline.store().table_names().is_empty());
    }
}
