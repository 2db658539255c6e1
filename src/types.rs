use chrono::NaiveDate;
use serde::Serialize;

use crate::frame::{Cell, Frame};

// ─── Column names ───

pub const COL_DATE: &str = "Date";
pub const COL_STRATEGY: &str = "Strategy";
pub const COL_PNL: &str = "PnL";
pub const COL_CAPITAL: &str = "Capital";
pub const COL_STRAT_RETURN: &str = "Strat Return";
pub const COL_CONCENTRATION: &str = "Concentration";
pub const COL_START_DATE: &str = "Start Date";
pub const COL_END_DATE: &str = "End Date";
pub const INDEX_WINDOW: &str = "window_idx";
pub const INDEX_ROW: &str = "row";

/// Build order of the per-window summary frame, before display reordering.
pub const SUMMARY_COLUMNS: [&str; 5] = [
    COL_STRAT_RETURN,
    COL_CAPITAL,
    COL_CONCENTRATION,
    COL_START_DATE,
    COL_END_DATE,
];

// ─── Raw input records ───

#[derive(Clone, Debug, PartialEq)]
pub struct PnlRecord {
    pub date: NaiveDate,
    pub strategy: String,
    pub pnl: f64,
}

/// One allocated-capital observation. `None` for a blank cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CapitalRecord {
    pub date: NaiveDate,
    pub capital: Option<f64>,
}

// ─── Pipeline rows ───

/// PnL row with the forward-filled capital for its date.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub strategy: String,
    pub pnl: f64,
    /// `None` when the date precedes every known capital value.
    pub capital: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowedRow {
    pub date: NaiveDate,
    pub strategy: String,
    pub pnl: f64,
    pub capital: Option<f64>,
    /// PnL / Capital. NaN when capital is missing.
    pub strat_return: f64,
    pub day_idx: usize,
    pub window_idx: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Summed return of one strategy inside one window.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyWindowReturn {
    pub window_idx: usize,
    pub strategy: String,
    pub strat_return: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One row of the final per-window table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowSummary {
    pub window_idx: usize,
    /// Sum of every strategy's return in the window.
    #[serde(rename = "Strat Return")]
    pub strat_return: f64,
    /// Mean capital across the window's rows. NaN if none was known.
    #[serde(rename = "Capital")]
    pub capital: f64,
    /// Top-N share of positive return. NaN when nothing was positive.
    #[serde(rename = "Concentration")]
    pub concentration: f64,
    #[serde(rename = "Start Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "End Date")]
    pub end_date: NaiveDate,
}

impl WindowSummary {
    /// Cells in `SUMMARY_COLUMNS` order.
    pub fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Float(self.strat_return),
            Cell::Float(self.capital),
            Cell::Float(self.concentration),
            Cell::Date(self.start_date),
            Cell::Date(self.end_date),
        ]
    }
}

/// Summary rows as a frame indexed by window index.
pub fn summary_frame(rows: &[WindowSummary]) -> Frame {
    let mut frame = Frame::new(
        INDEX_WINDOW,
        SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
    );
    for r in rows {
        frame.push_row(r.window_idx, r.cells());
    }
    frame
}

/// Summary rows as a frame densely indexed from 0.
pub fn positional_frame(rows: &[WindowSummary]) -> Frame {
    let mut frame = Frame::new(
        INDEX_ROW,
        SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
    );
    for (i, r) in rows.iter().enumerate() {
        frame.push_row(i, r.cells());
    }
    frame
}
