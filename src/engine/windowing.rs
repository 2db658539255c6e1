//! Day-boundary detection and fixed-size window assignment.
//!
//! A "day" is a distinct calendar date among the rows, not a calendar step:
//! a gap of several days between consecutive rows still advances the day
//! index by one. Window `w` covers day indices `[w * window, (w + 1) * window)`.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{PortfolioError, Result};
use crate::types::{MergedRow, WindowedRow};

/// Fails with `Unsorted` at the first row whose date precedes its predecessor.
pub fn ensure_sorted(rows: &[MergedRow]) -> Result<()> {
    match rows.windows(2).position(|w| w[1].date < w[0].date) {
        Some(i) => Err(PortfolioError::Unsorted { position: i + 1 }),
        None => Ok(()),
    }
}

/// 0-based running count of distinct dates, one entry per row.
pub fn day_indices(rows: &[MergedRow]) -> Vec<usize> {
    let mut out = Vec::with_capacity(rows.len());
    let mut day = 0usize;
    let mut prev: Option<NaiveDate> = None;
    for r in rows {
        if let Some(p) = prev {
            if r.date != p {
                day += 1;
            }
        }
        prev = Some(r.date);
        out.push(day);
    }
    out
}

/// Annotate date-sorted merged rows with return, day/window index and the
/// window's first and last date.
pub fn assign_windows(rows: &[MergedRow], window: usize) -> Result<Vec<WindowedRow>> {
    if window == 0 {
        return Err(PortfolioError::InvalidParameter {
            name: "window".into(),
            value: "0".into(),
            reason: "must be a positive number of days".into(),
        });
    }
    ensure_sorted(rows)?;

    let days = day_indices(rows);

    // Day indices step by at most one, so window indices are contiguous
    // from 0 and each window's bounds can be pushed in order.
    let mut bounds: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for (r, &day) in rows.iter().zip(&days) {
        let w = day / window;
        if w == bounds.len() {
            bounds.push((r.date, r.date));
        } else {
            bounds[w].1 = r.date;
        }
    }

    let out: Vec<WindowedRow> = rows
        .iter()
        .zip(&days)
        .map(|(r, &day)| {
            let w = day / window;
            let (start_date, end_date) = bounds[w];
            WindowedRow {
                date: r.date,
                strategy: r.strategy.clone(),
                pnl: r.pnl,
                capital: r.capital,
                strat_return: r.capital.map_or(f64::NAN, |c| r.pnl / c),
                day_idx: day,
                window_idx: w,
                start_date,
                end_date,
            }
        })
        .collect();

    debug!(
        "[WINDOW] {} rows over {} days into {} windows of {} days",
        out.len(),
        days.last().map_or(0, |d| d + 1),
        bounds.len(),
        window
    );
    Ok(out)
}
