//! A1-notation ranges for worksheet requests

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
pub fn column_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col + 1;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Quote a worksheet title for use in a range (`'it''s'`)
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Range covering a whole worksheet
pub fn sheet_range(title: &str) -> String {
    quote_title(title)
}

/// Range covering one whole column of a worksheet (`'sales'!B:B`)
pub fn column_range(title: &str, col: usize) -> String {
    let letters = column_to_letters(col);
    format!("{}!{}:{}", quote_title(title), letters, letters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(0), "A");
        assert_eq!(column_to_letters(5), "F");
        assert_eq!(column_to_letters(25), "Z");
        assert_eq!(column_to_letters(26), "AA");
        assert_eq!(column_to_letters(701), "ZZ");
        assert_eq!(column_to_letters(702), "AAA");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(sheet_range("sales"), "'sales'");
        assert_eq!(column_range("sales", 1), "'sales'!B:B");
        assert_eq!(sheet_range("joe's"), "'joe''s'");
    }
}
