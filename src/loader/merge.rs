use chrono::NaiveDate;
use tracing::debug;

use crate::types::{CapitalRecord, MergedRow, PnlRecord};

/// Capital carried forward onto every calendar day in `[start, end]`.
///
/// Entry `k` holds the value for `start + k days`; `None` until the first
/// known capital value.
pub struct DailyCapital {
    start: NaiveDate,
    values: Vec<Option<f64>>,
}

impl DailyCapital {
    /// Single left-to-right scan carrying the last known value.
    /// `capital` must be sorted by date. Blank observations carry nothing.
    /// When a date appears twice the later row wins.
    pub fn forward_fill(capital: &[CapitalRecord], start: NaiveDate, end: NaiveDate) -> Self {
        let days = (end - start).num_days().max(-1) + 1;
        let mut values = Vec::with_capacity(days as usize);
        let mut last: Option<f64> = None;
        let mut cursor = 0usize;

        for day in start.iter_days().take(days as usize) {
            while cursor < capital.len() && capital[cursor].date <= day {
                if let Some(v) = capital[cursor].capital {
                    last = Some(v);
                }
                cursor += 1;
            }
            values.push(last);
        }

        Self { start, values }
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        let offset = (date - self.start).num_days();
        if offset < 0 {
            return None;
        }
        self.values.get(offset as usize).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Join PnL rows with forward-filled daily capital.
///
/// Both inputs are sorted by date (stable, so same-day rows keep their
/// input order). The daily calendar runs from the earliest date in either
/// input to the last PnL date; capital observed after that is ignored.
pub fn merge_pnl_capital(mut pnl: Vec<PnlRecord>, mut capital: Vec<CapitalRecord>) -> Vec<MergedRow> {
    pnl.sort_by_key(|r| r.date);
    capital.sort_by_key(|r| r.date);

    let (first_pnl, last_pnl) = match (pnl.first(), pnl.last()) {
        (Some(f), Some(l)) => (f.date, l.date),
        _ => {
            debug!("[LOAD] No PnL rows, nothing to merge");
            return Vec::new();
        }
    };
    let start = capital
        .first()
        .map_or(first_pnl, |c| c.date.min(first_pnl));

    let daily = DailyCapital::forward_fill(&capital, start, last_pnl);
    debug!(
        "[LOAD] Calendar {}..{} ({} days), {} capital observations",
        start,
        last_pnl,
        daily.len(),
        capital.len()
    );

    pnl.into_iter()
        .map(|r| MergedRow {
            capital: daily.get(r.date),
            date: r.date,
            strategy: r.strategy,
            pnl: r.pnl,
        })
        .collect()
}
