use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::error::{PortfolioError, Result};
use crate::loader::source::{RawTable, TableSource};

/// File extensions opened as a workbook rather than a CSV directory.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Spreadsheet workbook where each sheet is a named table.
///
/// Every sheet is read once at open time; lookups afterwards never touch
/// the file.
pub struct WorkbookSource {
    sheets: Vec<RawTable>,
}

impl WorkbookSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut book = open_workbook_auto(path)?;
        let mut sheets = Vec::new();
        for name in book.sheet_names() {
            let range = book.worksheet_range(&name)?;
            sheets.push(table_from_range(&name, &range));
        }
        debug!("[LOAD] {}: {} sheets", path.display(), sheets.len());
        Ok(Self { sheets })
    }
}

impl TableSource for WorkbookSource {
    fn table(&self, name: &str) -> Result<RawTable> {
        self.sheets
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| PortfolioError::MissingTable {
                name: name.to_string(),
                available: self.table_names(),
            })
    }

    /// Sheet order as stored in the workbook.
    fn table_names(&self) -> Vec<String> {
        self.sheets.iter().map(|t| t.name.clone()).collect()
    }
}

/// Cell text in the forms `parse_date` / the amount parser accept.
/// Date cells become `YYYY-MM-DD HH:MM:SS`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        other => other.to_string().trim().to_string(),
    }
}

/// First row is the header; fully blank rows are dropped.
pub fn table_from_range(name: &str, range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|h| h.iter().map(cell_text).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|r| r.iter().map(cell_text).collect::<Vec<String>>())
        .filter(|r| !r.iter().all(|c| c.is_empty()))
        .collect();
    RawTable {
        name: name.to_string(),
        headers,
        rows,
    }
}
