//! Operator input validation
//!
//! Pure functions only: the prompt loop lives in the `stockcast` crate and
//! decides what to do with a rejection.

use crate::error::ValidationError;
use crate::row::SalesRow;
use crate::PRODUCT_COUNT;

/// Split a line of operator input on commas
pub fn split_input(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Validate raw tokens into a [`SalesRow`].
///
/// Every token is parsed before the count is checked, so `"a,b,c"` reports
/// the bad literal rather than the count.
pub fn validate<S: AsRef<str>>(tokens: &[S]) -> Result<SalesRow, ValidationError> {
    let mut parsed = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.as_ref().trim();
        let value = token
            .parse::<i64>()
            .map_err(|source| ValidationError::InvalidInteger {
                token: token.to_string(),
                source,
            })?;
        parsed.push(value);
    }

    let actual = parsed.len();
    let values: [i64; PRODUCT_COUNT] =
        parsed.try_into().map_err(|_| ValidationError::WrongCount {
            expected: PRODUCT_COUNT,
            actual,
        })?;

    if let Some(&negative) = values.iter().find(|v| **v < 0) {
        return Err(ValidationError::Negative(negative));
    }

    Ok(SalesRow::new(values))
}

/// Check tokens without keeping the row
pub fn is_valid<S: AsRef<str>>(tokens: &[S]) -> bool {
    validate(tokens).is_ok()
}

/// Split and validate one line of input
pub fn parse_sales(line: &str) -> Result<SalesRow, ValidationError> {
    validate(&split_input(line))
}
