// Shared test fixtures for loader and engine tests.
// Only compiled under #[cfg(test)].

use chrono::NaiveDate;

use crate::types::{CapitalRecord, MergedRow, PnlRecord, WindowSummary};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn pnl(y: i32, m: u32, day: u32, strategy: &str, amount: f64) -> PnlRecord {
    PnlRecord {
        date: d(y, m, day),
        strategy: strategy.to_string(),
        pnl: amount,
    }
}

pub fn cap(y: i32, m: u32, day: u32, amount: f64) -> CapitalRecord {
    CapitalRecord {
        date: d(y, m, day),
        capital: Some(amount),
    }
}

pub fn merged(date: NaiveDate, strategy: &str, amount: f64, capital: Option<f64>) -> MergedRow {
    MergedRow {
        date,
        strategy: strategy.to_string(),
        pnl: amount,
        capital,
    }
}

/// Merged rows for consecutive days from `start`, capital fixed.
/// `daily[k]` lists the (strategy, pnl) pairs booked on day `k`.
pub fn merged_days(start: NaiveDate, capital: f64, daily: &[&[(&str, f64)]]) -> Vec<MergedRow> {
    let mut rows = Vec::new();
    for (k, day) in daily.iter().enumerate() {
        let date = start + chrono::Duration::days(k as i64);
        for (strategy, amount) in day.iter() {
            rows.push(merged(date, strategy, *amount, Some(capital)));
        }
    }
    rows
}

/// Summary row with only the return filled in meaningfully.
pub fn summary(window_idx: usize, strat_return: f64) -> WindowSummary {
    let start = d(2024, 1, 1) + chrono::Duration::days(window_idx as i64 * 5);
    WindowSummary {
        window_idx,
        strat_return,
        capital: 1000.0,
        concentration: 1.0,
        start_date: start,
        end_date: start + chrono::Duration::days(4),
    }
}
