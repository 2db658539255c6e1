use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{PortfolioError, Result};

/// Untyped named table: trimmed headers plus string cells.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Headers are trimmed, so `" PnL "` is addressable as `"PnL"`.
    pub fn new(name: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.trim().to_string()).collect(),
            rows,
        }
    }

    pub fn from_csv_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            // Exported sheets often end with fully blank lines.
            if record.iter().all(|c| c.is_empty()) {
                continue;
            }
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| PortfolioError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Spreadsheet-like source of named tables.
pub trait TableSource {
    /// Fetch a table by name. Fails with `MissingTable` when absent.
    fn table(&self, name: &str) -> Result<RawTable>;

    fn table_names(&self) -> Vec<String>;
}

/// Directory of exported sheets, one `<table name>.csv` per table.
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(PortfolioError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input directory '{}' does not exist", dir.display()),
            )));
        }
        Ok(Self { dir })
    }
}

impl TableSource for CsvDirSource {
    fn table(&self, name: &str) -> Result<RawTable> {
        let path = self.dir.join(format!("{}.csv", name));
        if !path.is_file() {
            return Err(PortfolioError::MissingTable {
                name: name.to_string(),
                available: self.table_names(),
            });
        }
        let file = fs::File::open(&path)?;
        RawTable::from_csv_reader(name, file)
    }

    fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(&self.dir) {
            Ok(rd) => rd
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map_or(false, |x| x == "csv"))
                .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
                .collect(),
            Err(_) => vec![],
        };
        names.sort();
        names
    }
}

/// In-memory tables keyed by name.
#[derive(Default)]
pub struct MemorySource {
    tables: BTreeMap<String, RawTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: RawTable) -> Self {
        self.insert(table);
        self
    }

    pub fn insert(&mut self, table: RawTable) {
        self.tables.insert(table.name.clone(), table);
    }
}

impl TableSource for MemorySource {
    fn table(&self, name: &str) -> Result<RawTable> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| PortfolioError::MissingTable {
                name: name.to_string(),
                available: self.table_names(),
            })
    }

    fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}
