//! Fixed-width product rows

use std::fmt;
use std::marker::PhantomData;

use crate::PRODUCT_COUNT;

/// Marker for what a [`ProductRow`] holds
pub trait RowKind {
    /// Human-readable kind, used in logs
    const NAME: &'static str;
}

/// Units sold at the last market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sales;

/// Stock baseline per product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stock;

/// Stock minus sales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Surplus;

/// Projected stock for the next market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Forecast;

impl RowKind for Sales {
    const NAME: &'static str = "sales";
}

impl RowKind for Stock {
    const NAME: &'static str = "stock";
}

impl RowKind for Surplus {
    const NAME: &'static str = "surplus";
}

impl RowKind for Forecast {
    const NAME: &'static str = "forecast";
}

/// One value per product, aligned by product index.
///
/// The kind parameter keeps sales, stock, surplus and forecast rows apart at
/// compile time; the array keeps every row exactly [`PRODUCT_COUNT`] wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductRow<K> {
    values: [i64; PRODUCT_COUNT],
    kind: PhantomData<K>,
}

/// Validated operator input
pub type SalesRow = ProductRow<Sales>;
/// Last row of the stock table
pub type StockRow = ProductRow<Stock>;
/// `stock[i] - sales[i]`
pub type SurplusRow = ProductRow<Surplus>;
/// Next stock baseline
pub type ForecastRow = ProductRow<Forecast>;

impl<K> ProductRow<K> {
    /// Create a row from its values
    pub fn new(values: [i64; PRODUCT_COUNT]) -> Self {
        Self {
            values,
            kind: PhantomData,
        }
    }

    /// Get the values
    pub fn values(&self) -> &[i64; PRODUCT_COUNT] {
        &self.values
    }

    /// Get the values as a slice, ready for a table append
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }

    /// Get the value for one product
    pub fn get(&self, product: usize) -> Option<i64> {
        self.values.get(product).copied()
    }

    /// Iterate over the values in product order
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.values.iter().copied()
    }

    /// Consume the row, returning its values
    pub fn into_inner(self) -> [i64; PRODUCT_COUNT] {
        self.values
    }
}

impl<K: RowKind> ProductRow<K> {
    /// Name of the row kind
    pub fn kind_name(&self) -> &'static str {
        K::NAME
    }
}

impl<K> From<[i64; PRODUCT_COUNT]> for ProductRow<K> {
    fn from(values: [i64; PRODUCT_COUNT]) -> Self {
        Self::new(values)
    }
}

impl<K> fmt::Display for ProductRow<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}
