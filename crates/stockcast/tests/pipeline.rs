//! End-to-end tests for a full run (prompt -> sales -> surplus -> stock)

use std::io::Cursor;

use pretty_assertions::assert_eq;
use stockcast::{
    BackendKind, CsvStore, DeriveError, MemoryStore, Pipeline, PipelineError, StockcastConfig,
    StoreError, TableStore,
};
use tempfile::TempDir;

const HEADINGS: [&str; 6] = ["cheese", "ham", "turkey", "tuna", "egg", "chicken"];

/// Tables with headings, one stock row and four past sales
fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for table in ["sales", "surplus", "stock"] {
        store.create_table(table, &HEADINGS).unwrap();
    }
    store.append_row("stock", &[10, 20, 30, 40, 50, 60]).unwrap();
    for n in [3, 5, 4, 6] {
        store.append_row("sales", &[n; 6]).unwrap();
    }
    store
}

fn run<S: TableStore>(pipeline: &Pipeline<S>, input: &str) -> (stockcast::Result<stockcast::RunReport>, String) {
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut out = Vec::new();
    let result = pipeline.run(&mut reader, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn last(store: &impl TableStore, table: &str) -> Vec<String> {
    store.last_row(table).unwrap().unwrap()
}

#[test]
fn test_full_run() {
    let pipeline = Pipeline::new(seeded_store());

    let (result, out) = run(&pipeline, "2,2,2,2,2,2\n");
    let report = result.unwrap();

    assert_eq!(report.sales.values(), &[2; 6]);
    assert_eq!(report.surplus.values(), &[8, 18, 28, 38, 48, 58]);
    // window [3, 5, 4, 6, 2]: average 4.0, 4.4 rounds to 4
    assert_eq!(report.forecast.values(), &[4; 6]);
    assert_eq!(report.recommendation.get("cheese"), Some(4));

    let store = pipeline.store();
    assert_eq!(last(store, "sales"), vec!["2"; 6]);
    assert_eq!(last(store, "surplus"), vec!["8", "18", "28", "38", "48", "58"]);
    assert_eq!(last(store, "stock"), vec!["4"; 6]);

    assert!(out.contains("Data is valid!"));
    assert!(out.contains("Updating sales worksheet..."));
    assert!(out.contains("surplus worksheet updated successfully."));
    assert!(out.contains("Make the following numbers of sandwiches for next market:"));
    assert!(out.contains("cheese: 4, ham: 4, turkey: 4, tuna: 4, egg: 4, chicken: 4"));
}

#[test]
fn test_surplus_example() {
    let pipeline = Pipeline::new(seeded_store());

    let (result, _) = run(&pipeline, "5,25,20,40,45,70\n");

    assert_eq!(result.unwrap().surplus.values(), &[5, -5, 10, 0, 5, -10]);
}

#[test]
fn test_invalid_input_is_reprompted() {
    let pipeline = Pipeline::new(seeded_store());

    let (result, out) = run(&pipeline, "10,20,30\na,b,c,d,e,f\n2,2,2,2,2,2\n");

    assert!(result.is_ok());
    assert!(out.contains("Exactly 6 values required, you provided 3"));
    assert!(out.contains("invalid literal for integer: 'a'"));
    // rejected lines never reach the table
    assert_eq!(pipeline.store().row_count("sales").unwrap(), 6);
}

#[test]
fn test_window_ignores_older_sales() {
    let store = MemoryStore::new();
    for table in ["sales", "surplus", "stock"] {
        store.create_table(table, &HEADINGS).unwrap();
    }
    store.append_row("stock", &[0; 6]).unwrap();
    for n in [1000, 3, 5, 4, 6] {
        store.append_row("sales", &[n; 6]).unwrap();
    }
    let pipeline = Pipeline::new(store);

    let (result, _) = run(&pipeline, "2,2,2,2,2,2\n");

    assert_eq!(result.unwrap().forecast.values(), &[4; 6]);
}

#[test]
fn test_missing_stock_table_is_fatal_after_sales_write() {
    let store = MemoryStore::new();
    store.create_table("sales", &HEADINGS).unwrap();
    store.create_table("surplus", &HEADINGS).unwrap();
    let pipeline = Pipeline::new(store);

    let (result, _) = run(&pipeline, "1,2,3,4,5,6\n");

    assert!(matches!(
        result.unwrap_err(),
        PipelineError::Store(StoreError::TableNotFound(ref t)) if t == "stock"
    ));
    // writes are not transactional
    assert_eq!(last(pipeline.store(), "sales"), vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_corrupt_stock_row_fails_fast() {
    let store = seeded_store();
    store.push_raw_row("stock", &["1", "2", "3", "4", "5"]).unwrap();
    let pipeline = Pipeline::new(store);

    let (result, _) = run(&pipeline, "1,1,1,1,1,1\n");

    assert!(matches!(
        result.unwrap_err(),
        PipelineError::Derive(DeriveError::RowWidth { actual: 5, .. })
    ));
}

#[test]
fn test_eof_before_valid_input() {
    let pipeline = Pipeline::new(seeded_store());

    let (result, _) = run(&pipeline, "1,2,3\n");

    assert!(matches!(result.unwrap_err(), PipelineError::Io(_)));
    assert_eq!(pipeline.store().row_count("sales").unwrap(), 5);
}

#[test]
fn test_csv_backend_run() {
    let dir = TempDir::new().unwrap();
    let config = StockcastConfig::from_toml(
        &format!(
            "backend = \"csv\"\n[csv]\ndata_dir = {:?}\n",
            dir.path().join("tables").display().to_string()
        ),
        std::path::Path::new("stockcast.toml"),
    )
    .unwrap();
    assert_eq!(config.backend, BackendKind::Csv);

    let store: CsvStore = config.csv_store();
    for table in config.tables.all() {
        store.create_table(table, &config.products).unwrap();
    }
    store.append_row("stock", &[10, 20, 30, 40, 50, 60]).unwrap();

    let pipeline = Pipeline::from_config(store, &config);
    let (result, _) = run(&pipeline, "5,25,20,40,45,70\n");
    let report = result.unwrap();

    assert_eq!(report.surplus.values(), &[5, -5, 10, 0, 5, -10]);

    let text = std::fs::read_to_string(dir.path().join("tables").join("surplus.csv")).unwrap();
    assert_eq!(text, "cheese,ham,turkey,tuna,egg,chicken\n5,-5,10,0,5,-10\n");

    let stock = last(pipeline.store(), "stock");
    let forecast: Vec<String> = report.forecast.iter().map(|v| v.to_string()).collect();
    assert_eq!(stock, forecast);
}

#[test]
fn test_boxed_store_from_config() {
    let dir = TempDir::new().unwrap();
    let mut config = StockcastConfig::default();
    config.backend = BackendKind::Csv;
    config.csv.data_dir = dir.path().to_path_buf();

    let store = config.open_store().unwrap();
    assert_eq!(store.backend_name(), "csv");

    let err = store.get_all_rows("sales").unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(_)));
}

#[test]
fn test_surplus_overflow_fails_the_run() {
    let store = MemoryStore::new();
    for table in ["sales", "surplus", "stock"] {
        store.create_table(table, &HEADINGS).unwrap();
    }
    store.append_row("stock", &[-2, 0, 0, 0, 0, 0]).unwrap();
    let pipeline = Pipeline::new(store);

    let (result, _) = run(&pipeline, "9223372036854775807,0,0,0,0,0\n");

    assert!(matches!(
        result.unwrap_err(),
        PipelineError::Derive(DeriveError::Overflow { product: 0 })
    ));
    assert_eq!(pipeline.store().row_count("surplus").unwrap(), 1);
}
