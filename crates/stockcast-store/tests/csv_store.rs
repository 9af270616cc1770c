//! End-to-end tests for the CSV directory store (create -> append -> read)

use pretty_assertions::assert_eq;
use stockcast_store::{CsvStore, CsvStoreOptions, LineTerminator, StoreError, TableStore};
use tempfile::TempDir;

const HEADINGS: [&str; 6] = ["cheese", "ham", "turkey", "tuna", "egg", "chicken"];

fn store_with_sales() -> (TempDir, CsvStore) {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path().join("tables"));
    store.create_table("sales", &HEADINGS).unwrap();
    (dir, store)
}

#[test]
fn test_append_then_last_row_roundtrip() {
    let (_dir, store) = store_with_sales();

    store.append_row("sales", &[10, 20, 30, 40, 50, 60]).unwrap();

    let last = store.last_row("sales").unwrap().unwrap();
    assert_eq!(last, vec!["10", "20", "30", "40", "50", "60"]);
}

#[test]
fn test_header_row_is_kept() {
    let (_dir, store) = store_with_sales();
    store.append_row("sales", &[1, 2, 3, 4, 5, 6]).unwrap();

    let rows = store.get_all_rows("sales").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], HEADINGS.to_vec());
}

#[test]
fn test_get_column_in_append_order() {
    let (_dir, store) = store_with_sales();
    for n in 1..=3 {
        store.append_row("sales", &[n, n * 10, 0, 0, 0, 0]).unwrap();
    }

    assert_eq!(
        store.get_column("sales", 1).unwrap(),
        vec!["ham", "10", "20", "30"]
    );
}

#[test]
fn test_file_layout() {
    let (dir, store) = store_with_sales();
    store.append_row("sales", &[1, 2, 3, 4, 5, 6]).unwrap();

    let text = std::fs::read_to_string(dir.path().join("tables").join("sales.csv")).unwrap();
    assert_eq!(text, "cheese,ham,turkey,tuna,egg,chicken\n1,2,3,4,5,6\n");
}

#[test]
fn test_missing_table_is_reported() {
    let (_dir, store) = store_with_sales();

    let err = store.append_row("surplus", &[1, 2, 3, 4, 5, 6]).unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(ref t) if t == "surplus"));

    let err = store.get_all_rows("stock").unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(_)));
}

#[test]
fn test_create_existing_table_fails() {
    let (_dir, store) = store_with_sales();
    let err = store.create_table("sales", &HEADINGS).unwrap_err();
    assert!(matches!(err, StoreError::TableExists(_)));
    assert!(store.has_table("sales").unwrap());
    assert!(!store.has_table("stock").unwrap());
}

#[test]
fn test_ragged_rows_are_tolerated() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("stock.csv"), "a,b,c\n1,2\n3,4,5,6\n").unwrap();
    let store = CsvStore::new(dir.path());

    let rows = store.get_all_rows("stock").unwrap();
    assert_eq!(rows[1], vec!["1", "2"]);
    assert_eq!(store.get_column("stock", 2).unwrap(), vec!["c", "", "5"]);
}

#[test]
fn test_append_after_missing_trailing_newline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.csv");
    std::fs::write(&path, "a,b,c,d,e,f\n10,20,30,40,50,60").unwrap();
    let store = CsvStore::new(dir.path());

    store.append_row("stock", &[1, 2, 3, 4, 5, 6]).unwrap();

    let rows = store.get_all_rows("stock").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], vec!["10", "20", "30", "40", "50", "60"]);
    assert_eq!(rows[2], vec!["1", "2", "3", "4", "5", "6"]);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "a,b,c,d,e,f\n10,20,30,40,50,60\n1,2,3,4,5,6\n"
    );
}

#[test]
fn test_append_uses_configured_terminator_for_repair() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.csv");
    std::fs::write(&path, "a,b,c,d,e,f").unwrap();
    let options = CsvStoreOptions {
        line_terminator: LineTerminator::CRLF,
        ..Default::default()
    };
    let store = CsvStore::with_options(dir.path(), options);

    store.append_row("stock", &[1, 2, 3, 4, 5, 6]).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "a,b,c,d,e,f\r\n1,2,3,4,5,6\r\n"
    );
}

#[test]
fn test_append_to_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales.csv");
    std::fs::write(&path, "").unwrap();
    let store = CsvStore::new(dir.path());

    store.append_row("sales", &[1, 2, 3, 4, 5, 6]).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,2,3,4,5,6\n");
}
