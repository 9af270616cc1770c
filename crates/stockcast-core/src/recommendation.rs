//! Forecast values labelled with product headings

use std::fmt;

use crate::row::ForecastRow;

/// What to prepare for the next market
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecommendation {
    items: Vec<(String, i64)>,
}

impl StockRecommendation {
    /// Pair each forecast value with its heading.
    ///
    /// Missing or blank headings fall back to `product N` (1-based).
    pub fn new<S: AsRef<str>>(headings: &[S], forecast: &ForecastRow) -> Self {
        let items = forecast
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let heading = headings
                    .get(i)
                    .map(|h| h.as_ref().trim())
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("product {}", i + 1));
                (heading, value)
            })
            .collect();
        Self { items }
    }

    /// Heading/value pairs in product order
    pub fn items(&self) -> &[(String, i64)] {
        &self.items
    }

    /// Look up the value for a heading
    pub fn get(&self, heading: &str) -> Option<i64> {
        self.items
            .iter()
            .find(|(h, _)| h == heading)
            .map(|(_, value)| *value)
    }
}

impl fmt::Display for StockRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (heading, value)) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", heading, value)?;
        }
        Ok(())
    }
}
