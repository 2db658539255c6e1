use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{PortfolioError, Result};
use crate::loader::source::RawTable;
use crate::types::{CapitalRecord, PnlRecord, COL_CAPITAL, COL_DATE, COL_PNL, COL_STRATEGY};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a calendar date, discarding any time-of-day.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Numeric cell. Thousands separators are accepted; blank is `None`.
fn parse_amount(s: &str) -> std::result::Result<Option<f64>, ()> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned.parse::<f64>().map(Some).map_err(|_| ())
}

fn date_at(table: &RawTable, row: usize, cells: &[String], i: usize) -> Result<NaiveDate> {
    let raw = cells.get(i).map(|s| s.as_str()).unwrap_or("");
    parse_date(raw).ok_or_else(|| PortfolioError::DateParse {
        table: table.name.clone(),
        row,
        value: raw.to_string(),
    })
}

fn amount_at(
    table: &RawTable,
    row: usize,
    cells: &[String],
    i: usize,
    column: &str,
) -> Result<Option<f64>> {
    let raw = cells.get(i).map(|s| s.as_str()).unwrap_or("");
    parse_amount(raw).map_err(|_| PortfolioError::ValueParse {
        table: table.name.clone(),
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Typed PnL rows. A blank PnL cell becomes NaN. Rows are numbered from 0.
pub fn read_pnl(table: &RawTable) -> Result<Vec<PnlRecord>> {
    let i_date = table.column_index(COL_DATE)?;
    let i_strat = table.column_index(COL_STRATEGY)?;
    let i_pnl = table.column_index(COL_PNL)?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            Ok(PnlRecord {
                date: date_at(table, row, cells, i_date)?,
                strategy: cells.get(i_strat).cloned().unwrap_or_default(),
                pnl: amount_at(table, row, cells, i_pnl, COL_PNL)?.unwrap_or(f64::NAN),
            })
        })
        .collect()
}

/// Typed capital rows. A blank Capital cell is kept as `None`.
pub fn read_capital(table: &RawTable) -> Result<Vec<CapitalRecord>> {
    let i_date = table.column_index(COL_DATE)?;
    let i_cap = table.column_index(COL_CAPITAL)?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            Ok(CapitalRecord {
                date: date_at(table, row, cells, i_date)?,
                capital: amount_at(table, row, cells, i_cap, COL_CAPITAL)?,
            })
        })
        .collect()
}
