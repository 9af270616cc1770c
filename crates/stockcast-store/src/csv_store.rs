//! CSV directory store

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::options::CsvStoreOptions;
use crate::table::{column_of, TableStore};

/// One `<table>.csv` file per table inside a directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
    options: CsvStoreOptions,
}

impl CsvStore {
    /// Open a store rooted at `dir` with default options
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_options(dir, CsvStoreOptions::default())
    }

    /// Open a store rooted at `dir`
    pub fn with_options<P: Into<PathBuf>>(dir: P, options: CsvStoreOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    /// Directory holding the table files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `table`
    pub fn table_path(&self, table: &str) -> StoreResult<PathBuf> {
        if table.is_empty()
            || table == "."
            || table == ".."
            || table.contains(['/', '\\', '\0'])
        {
            return Err(StoreError::InvalidTableName(table.to_string()));
        }
        Ok(self
            .dir
            .join(format!("{}.{}", table, self.options.extension)))
    }

    /// Whether a table file exists
    pub fn has_table(&self, table: &str) -> StoreResult<bool> {
        Ok(self.table_path(table)?.is_file())
    }

    /// Create the directory (if needed) and a table whose first row holds
    /// `headings`
    pub fn create_table<S: AsRef<str>>(&self, table: &str, headings: &[S]) -> StoreResult<()> {
        let path = self.table_path(table)?;
        std::fs::create_dir_all(&self.dir)?;

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StoreError::TableExists(table.to_string())
                } else {
                    StoreError::Io(e)
                }
            })?;

        if !headings.is_empty() {
            let mut writer = self.writer(file);
            writer.write_record(headings.iter().map(|h| h.as_ref()))?;
            writer.flush()?;
        }
        tracing::info!(table, path = %path.display(), "created table");
        Ok(())
    }

    fn writer(&self, file: File) -> csv::Writer<File> {
        csv::WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .terminator(self.options.line_terminator.to_csv())
            .flexible(true)
            .from_writer(file)
    }

    /// Hand-edited files often lack a final newline; add one so the next
    /// record starts on its own line
    fn terminate_last_line(&self, file: &mut File) -> StoreResult<()> {
        if file.metadata()?.len() == 0 {
            return Ok(());
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            tracing::debug!("table file has no trailing newline, adding one");
            file.write_all(self.options.line_terminator.as_bytes())?;
        }
        Ok(())
    }

    fn open_existing(&self, table: &str, append: bool) -> StoreResult<File> {
        let path = self.table_path(table)?;
        let result = if append {
            OpenOptions::new().read(true).append(true).open(&path)
        } else {
            File::open(&path)
        };
        result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::TableNotFound(table.to_string())
            } else {
                StoreError::Io(e)
            }
        })
    }
}

impl TableStore for CsvStore {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    fn append_row(&self, table: &str, row: &[i64]) -> StoreResult<()> {
        let mut file = self.open_existing(table, true)?;
        self.terminate_last_line(&mut file)?;
        let mut writer = self.writer(file);
        writer.write_record(row.iter().map(i64::to_string))?;
        writer.flush()?;
        tracing::debug!(table, values = row.len(), "appended csv row");
        Ok(())
    }

    fn get_all_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        let file = self.open_existing(table, false)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    fn get_column(&self, table: &str, index: usize) -> StoreResult<Vec<String>> {
        let rows = self.get_all_rows(table)?;
        Ok(column_of(&rows, index))
    }
}
