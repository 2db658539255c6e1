//! Windows that immediately follow a positive-return window.

use tracing::debug;

use crate::error::{PortfolioError, Result};
use crate::types::WindowSummary;

/// Fails unless row `i` carries window index `i` for every row.
pub fn ensure_contiguous(table: &[WindowSummary]) -> Result<()> {
    match table.iter().enumerate().find(|(i, s)| s.window_idx != *i) {
        Some((position, s)) => Err(PortfolioError::NonContiguousWindows {
            position,
            window_idx: s.window_idx,
        }),
        None => Ok(()),
    }
}

/// Rows at `p + 1` for every `p` in `positions`. Out of range fails loudly.
pub fn rows_after(table: &[WindowSummary], positions: &[usize]) -> Result<Vec<WindowSummary>> {
    positions
        .iter()
        .map(|&p| {
            table
                .get(p + 1)
                .cloned()
                .ok_or(PortfolioError::IndexOutOfRange {
                    position: p + 1,
                    len: table.len(),
                })
        })
        .collect()
}

/// Windows following a window with positive total return.
///
/// The last window is dropped from the candidates when its return is
/// non-negative, since it has no successor. Result positions run densely
/// from 0; each row keeps its own `window_idx`.
pub fn following_positive(table: &[WindowSummary]) -> Result<Vec<WindowSummary>> {
    let last = match table.last() {
        Some(l) => l,
        None => return Ok(Vec::new()),
    };
    ensure_contiguous(table)?;

    let candidates = if last.strat_return >= 0.0 {
        &table[..table.len() - 1]
    } else {
        table
    };
    let positions: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, s)| s.strat_return > 0.0)
        .map(|(i, _)| i)
        .collect();

    let out = rows_after(table, &positions)?;
    debug!(
        "[FOLLOW] {} positive windows of {} with a successor",
        out.len(),
        table.len()
    );
    Ok(out)
}
