//! Surplus and stock forecast derivations
//!
//! Stored tables come back as strings, one `Vec<String>` per row (or per
//! column). The helpers here turn them into typed rows and do the
//! arithmetic.

use crate::error::DeriveError;
use crate::row::{ForecastRow, ProductRow, SalesRow, StockRow, SurplusRow};
use crate::{DEFAULT_FACTOR, DEFAULT_WINDOW, PRODUCT_COUNT};

/// How the next stock baseline is projected from sales history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPolicy {
    /// Number of trailing sales entries averaged per product
    pub window: usize,
    /// Multiplier applied to the average before rounding
    pub factor: f64,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            factor: DEFAULT_FACTOR,
        }
    }
}

impl ForecastPolicy {
    /// Reject a zero window or a non-finite / negative factor
    pub fn check(&self) -> Result<(), DeriveError> {
        if self.window == 0 {
            return Err(DeriveError::InvalidPolicy("window must be at least 1".into()));
        }
        if !self.factor.is_finite() || self.factor < 0.0 {
            return Err(DeriveError::InvalidPolicy(format!(
                "factor must be a non-negative number, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

/// `surplus[i] = stock[i] - sales[i]`, failing if a difference leaves `i64`
pub fn calculate_surplus(stock: &StockRow, sales: &SalesRow) -> Result<SurplusRow, DeriveError> {
    let mut values = [0i64; PRODUCT_COUNT];
    for (product, slot) in values.iter_mut().enumerate() {
        *slot = stock.values()[product]
            .checked_sub(sales.values()[product])
            .ok_or(DeriveError::Overflow { product })?;
    }
    Ok(SurplusRow::new(values))
}

/// Parse one stored cell.
///
/// Spreadsheets sometimes hand integers back as `"12.0"`; those are accepted
/// when the fractional part is zero.
pub fn parse_cell(table: &str, row: usize, column: usize, raw: &str) -> Result<i64, DeriveError> {
    let text = raw.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Ok(value);
    }

    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 => Ok(n as i64),
        _ => Err(DeriveError::InvalidCell {
            table: table.to_string(),
            row,
            column,
            value: raw.to_string(),
        }),
    }
}

/// Parse a stored row into a typed row, failing on width mismatch
pub fn parse_row<K, S: AsRef<str>>(
    table: &str,
    row: usize,
    cells: &[S],
) -> Result<ProductRow<K>, DeriveError> {
    if cells.len() != PRODUCT_COUNT {
        return Err(DeriveError::RowWidth {
            table: table.to_string(),
            row,
            expected: PRODUCT_COUNT,
            actual: cells.len(),
        });
    }

    let mut values = [0i64; PRODUCT_COUNT];
    for (column, (slot, cell)) in values.iter_mut().zip(cells).enumerate() {
        *slot = parse_cell(table, row, column, cell.as_ref())?;
    }
    Ok(ProductRow::new(values))
}

/// Take the last data row of a table.
///
/// Row numbers in errors are 0-based positions in `rows`, header included.
pub fn last_data_row<K, S: AsRef<str>>(
    table: &str,
    rows: &[Vec<S>],
    has_header: bool,
) -> Result<ProductRow<K>, DeriveError> {
    let first_data = usize::from(has_header);
    if rows.len() <= first_data {
        return Err(DeriveError::EmptyTable {
            table: table.to_string(),
        });
    }
    let index = rows.len() - 1;
    parse_row(table, index, &rows[index])
}

/// Trailing sales entries, one list per product column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesHistoryWindow {
    columns: [Vec<i64>; PRODUCT_COUNT],
}

impl SalesHistoryWindow {
    /// Build a window from already-parsed columns, keeping the last `window`
    /// entries of each
    pub fn new(columns: [Vec<i64>; PRODUCT_COUNT], window: usize) -> Self {
        let columns = columns.map(|column| {
            let start = column.len().saturating_sub(window);
            column[start..].to_vec()
        });
        Self { columns }
    }

    /// Build a window from raw column reads of the sales table
    pub fn from_columns<S: AsRef<str>>(
        table: &str,
        columns: &[Vec<S>],
        has_header: bool,
        window: usize,
    ) -> Result<Self, DeriveError> {
        if columns.len() != PRODUCT_COUNT {
            return Err(DeriveError::RowWidth {
                table: table.to_string(),
                row: 0,
                expected: PRODUCT_COUNT,
                actual: columns.len(),
            });
        }

        let first_data = usize::from(has_header);
        let mut parsed: [Vec<i64>; PRODUCT_COUNT] = Default::default();
        for (column, (slot, raw)) in parsed.iter_mut().zip(columns).enumerate() {
            let start = raw.len().saturating_sub(window).max(first_data);
            for (row, cell) in raw.iter().enumerate().skip(start) {
                slot.push(parse_cell(table, row, column, cell.as_ref())?);
            }
        }

        Ok(Self::new(parsed, window))
    }

    /// Entries for one product, oldest first
    pub fn column(&self, product: usize) -> &[i64] {
        &self.columns[product]
    }

    /// All columns
    pub fn columns(&self) -> &[Vec<i64>; PRODUCT_COUNT] {
        &self.columns
    }
}

/// Average `entries`, scale by `factor` and round half to even.
///
/// Returns `None` for an empty slice.
pub fn forecast_value(entries: &[i64], factor: f64) -> Option<i64> {
    if entries.is_empty() {
        return None;
    }
    let sum: f64 = entries.iter().map(|&v| v as f64).sum();
    let average = sum / entries.len() as f64;
    Some((average * factor).round_ties_even() as i64)
}

/// Project the next stock baseline from a sales window
pub fn forecast_stock(
    table: &str,
    window: &SalesHistoryWindow,
    policy: &ForecastPolicy,
) -> Result<ForecastRow, DeriveError> {
    policy.check()?;

    let mut values = [0i64; PRODUCT_COUNT];
    for (product, slot) in values.iter_mut().enumerate() {
        *slot = forecast_value(window.column(product), policy.factor).ok_or_else(|| {
            DeriveError::EmptyTable {
                table: table.to_string(),
            }
        })?;
    }
    Ok(ForecastRow::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Stock;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_surplus() {
        let stock = StockRow::new([10, 20, 30, 40, 50, 60]);
        let sales = SalesRow::new([5, 25, 20, 40, 45, 70]);
        let surplus = calculate_surplus(&stock, &sales).unwrap();
        assert_eq!(surplus.values(), &[5, -5, 10, 0, 5, -10]);
    }

    #[test]
    fn test_surplus_overflow_is_an_error() {
        let stock = StockRow::new([0, 0, -2, 0, 0, 0]);
        let sales = crate::parse_sales("0,0,9223372036854775807,0,0,0").unwrap();
        assert_eq!(
            calculate_surplus(&stock, &sales).unwrap_err(),
            DeriveError::Overflow { product: 2 }
        );

        // the extremes that still fit
        let stock = StockRow::new([i64::MIN + i64::MAX, 0, 0, 0, 0, i64::MAX]);
        let sales = SalesRow::new([i64::MAX, 0, 0, 0, 0, 0]);
        let surplus = calculate_surplus(&stock, &sales).unwrap();
        assert_eq!(surplus.get(0), Some(i64::MIN));
        assert_eq!(surplus.get(5), Some(i64::MAX));
    }

    #[test]
    fn test_forecast_value_from_window() {
        // average 4.0, 4.4 rounds to 4
        assert_eq!(forecast_value(&[3, 5, 4, 6, 2], 1.1), Some(4));
        assert_eq!(forecast_value(&[], 1.1), None);
    }

    #[test]
    fn test_forecast_rounds_half_to_even() {
        assert_eq!(forecast_value(&[2, 3], 1.0), Some(2));
        assert_eq!(forecast_value(&[3, 4], 1.0), Some(4));
        assert_eq!(forecast_value(&[10], 1.25), Some(12));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("stock", 1, 0, " 42 "), Ok(42));
        assert_eq!(parse_cell("stock", 1, 0, "12.0"), Ok(12));
        assert_eq!(
            parse_cell("stock", 3, 2, "12.5"),
            Err(DeriveError::InvalidCell {
                table: "stock".into(),
                row: 3,
                column: 2,
                value: "12.5".into(),
            })
        );
    }

    #[test]
    fn test_last_data_row_skips_header() {
        let rows = vec![
            strings(&["a", "b", "c", "d", "e", "f"]),
            strings(&["1", "2", "3", "4", "5", "6"]),
            strings(&["10", "20", "30", "40", "50", "60"]),
        ];
        let row: StockRow = last_data_row("stock", &rows, true).unwrap();
        assert_eq!(row.values(), &[10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_last_data_row_header_only() {
        let rows = vec![strings(&["a", "b", "c", "d", "e", "f"])];
        let err = last_data_row::<Stock, _>("stock", &rows, true).unwrap_err();
        assert_eq!(
            err,
            DeriveError::EmptyTable {
                table: "stock".into()
            }
        );
    }

    #[test]
    fn test_width_mismatch_fails_fast() {
        let rows = vec![strings(&["10", "20", "30", "40", "50"])];
        let err = last_data_row::<Stock, _>("stock", &rows, false).unwrap_err();
        assert_eq!(
            err,
            DeriveError::RowWidth {
                table: "stock".into(),
                row: 0,
                expected: 6,
                actual: 5,
            }
        );
    }

    #[test]
    fn test_window_keeps_trailing_entries() {
        let column = strings(&["cheese", "1", "2", "3", "4", "5", "6", "7"]);
        let columns: Vec<Vec<String>> = (0..PRODUCT_COUNT).map(|_| column.clone()).collect();
        let window = SalesHistoryWindow::from_columns("sales", &columns, true, 5).unwrap();
        assert_eq!(window.column(0), &[3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_window_short_history_excludes_header() {
        let column = strings(&["cheese", "4", "8"]);
        let columns: Vec<Vec<String>> = (0..PRODUCT_COUNT).map(|_| column.clone()).collect();
        let window = SalesHistoryWindow::from_columns("sales", &columns, true, 5).unwrap();
        assert_eq!(window.column(5), &[4, 8]);

        let forecast = forecast_stock("sales", &window, &ForecastPolicy::default()).unwrap();
        // 6.0 * 1.1 = 6.6
        assert_eq!(forecast.values(), &[7; PRODUCT_COUNT]);
    }

    #[test]
    fn test_forecast_empty_history() {
        let columns: Vec<Vec<String>> = (0..PRODUCT_COUNT).map(|_| strings(&["h"])).collect();
        let window = SalesHistoryWindow::from_columns("sales", &columns, true, 5).unwrap();
        let err = forecast_stock("sales", &window, &ForecastPolicy::default()).unwrap_err();
        assert!(matches!(err, DeriveError::EmptyTable { .. }));
    }

    #[test]
    fn test_policy_check() {
        let policy = ForecastPolicy {
            window: 0,
            factor: 1.1,
        };
        assert!(policy.check().is_err());
        let policy = ForecastPolicy {
            window: 5,
            factor: f64::NAN,
        };
        assert!(policy.check().is_err());
        assert!(ForecastPolicy::default().check().is_ok());
    }
}
