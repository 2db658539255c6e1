pub mod merge;
pub mod parse;
pub mod source;
pub mod workbook;

use std::path::Path;

use tracing::info;

use crate::error::{PortfolioError, Result};
use crate::types::{CapitalRecord, PnlRecord};

pub use merge::{merge_pnl_capital, DailyCapital};
pub use parse::{parse_date, read_capital, read_pnl};
pub use source::{CsvDirSource, MemorySource, RawTable, TableSource};
pub use workbook::{WorkbookSource, WORKBOOK_EXTENSIONS};

/// Open `path` as a table source: a directory is read as one CSV per table,
/// a workbook file (`.xlsx`, `.xls`, `.ods`, ...) as one table per sheet.
pub fn open_source(path: &Path) -> Result<Box<dyn TableSource>> {
    if path.is_dir() {
        return Ok(Box::new(CsvDirSource::open(path)?));
    }
    let is_workbook = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| WORKBOOK_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if is_workbook {
        return Ok(Box::new(WorkbookSource::open(path)?));
    }
    Err(PortfolioError::UnsupportedInput {
        path: path.display().to_string(),
    })
}

/// Pull and type both input tables. Either one missing aborts the load.
pub fn load_inputs(
    source: &dyn TableSource,
    pnl_table: &str,
    capital_table: &str,
) -> Result<(Vec<PnlRecord>, Vec<CapitalRecord>)> {
    let pnl = read_pnl(&source.table(pnl_table)?)?;
    let capital = read_capital(&source.table(capital_table)?)?;
    info!(
        "[LOAD] '{}': {} PnL rows, '{}': {} capital rows",
        pnl_table,
        pnl.len(),
        capital_table,
        capital.len()
    );
    Ok((pnl, capital))
}
