//! Per-window aggregation and top-N return concentration.
//!
//! Concentration for window `w` is
//! `sum(top_n positive strategy returns) / sum(all positive strategy returns)`,
//! where a strategy's return is its summed daily return inside `w`.
//! Windows without any positive strategy get NaN.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::error::{PortfolioError, Result};
use crate::math::stats::{nan_mean, nan_sum, ratio_or_nan};
use crate::types::{StrategyWindowReturn, WindowSummary, WindowedRow};

/// Whole-window aggregates over every row (all strategies, all days).
#[derive(Clone, Debug, PartialEq)]
pub struct WindowTotals {
    pub window_idx: usize,
    pub strat_return: f64,
    pub capital: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Positive-return sums feeding one window's concentration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositiveSums {
    pub total: f64,
    pub top: f64,
    /// Strategies counted in `top`, best first.
    pub top_strategies: Vec<String>,
}

/// One entry per window index, in order. Returns are NaN-skipping sums,
/// capital a NaN-skipping mean.
pub fn window_totals(rows: &[WindowedRow]) -> Vec<WindowTotals> {
    let mut grouped: BTreeMap<usize, (Vec<f64>, Vec<f64>, NaiveDate, NaiveDate)> = BTreeMap::new();
    for r in rows {
        let e = grouped
            .entry(r.window_idx)
            .or_insert_with(|| (Vec::new(), Vec::new(), r.start_date, r.end_date));
        e.0.push(r.strat_return);
        e.1.push(r.capital.unwrap_or(f64::NAN));
    }
    grouped
        .into_iter()
        .map(|(window_idx, (rets, caps, start_date, end_date))| WindowTotals {
            window_idx,
            strat_return: nan_sum(rets),
            capital: nan_mean(caps),
            start_date,
            end_date,
        })
        .collect()
}

/// Summed return per (window, strategy), ordered by window then strategy name.
pub fn strategy_window_returns(rows: &[WindowedRow]) -> Vec<StrategyWindowReturn> {
    let mut grouped: BTreeMap<(usize, &str), StrategyWindowReturn> = BTreeMap::new();
    for r in rows {
        let e = grouped
            .entry((r.window_idx, r.strategy.as_str()))
            .or_insert_with(|| StrategyWindowReturn {
                window_idx: r.window_idx,
                strategy: r.strategy.clone(),
                strat_return: 0.0,
                start_date: r.start_date,
                end_date: r.end_date,
            });
        if !r.strat_return.is_nan() {
            e.strat_return += r.strat_return;
        }
    }
    grouped.into_values().collect()
}

/// Strictly positive strategy returns, ranked within each window.
///
/// Order: window ascending, return descending, then strategy name ascending
/// so equal returns rank deterministically.
pub fn rank_positive(returns: &[StrategyWindowReturn]) -> Vec<StrategyWindowReturn> {
    let mut ranked: Vec<StrategyWindowReturn> = returns
        .iter()
        .filter(|r| r.strat_return > 0.0)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        a.window_idx
            .cmp(&b.window_idx)
            .then(
                b.strat_return
                    .partial_cmp(&a.strat_return)
                    .unwrap_or(Ordering::Equal),
            )
            .then_with(|| a.strategy.cmp(&b.strategy))
    });
    ranked
}

/// First `top_n` entries of each window from a `rank_positive` output.
pub fn top_n_per_window(ranked: &[StrategyWindowReturn], top_n: usize) -> Vec<&StrategyWindowReturn> {
    let mut out = Vec::new();
    let mut current: Option<usize> = None;
    let mut taken = 0usize;
    for r in ranked {
        if current != Some(r.window_idx) {
            current = Some(r.window_idx);
            taken = 0;
        }
        if taken < top_n {
            out.push(r);
            taken += 1;
        }
    }
    out
}

/// Total and top-N positive sums keyed by window index. Windows with no
/// positive strategy are absent.
pub fn positive_sums(ranked: &[StrategyWindowReturn], top_n: usize) -> BTreeMap<usize, PositiveSums> {
    let mut sums: BTreeMap<usize, PositiveSums> = BTreeMap::new();
    for r in ranked {
        sums.entry(r.window_idx).or_default().total += r.strat_return;
    }
    for r in top_n_per_window(ranked, top_n) {
        let e = sums.entry(r.window_idx).or_default();
        e.top += r.strat_return;
        e.top_strategies.push(r.strategy.clone());
    }
    sums
}

/// Per-window summary table, one row per window index.
pub fn concentration_table(rows: &[WindowedRow], top_n: usize) -> Result<Vec<WindowSummary>> {
    if top_n == 0 {
        return Err(PortfolioError::InvalidParameter {
            name: "top_n".into(),
            value: "0".into(),
            reason: "must select at least one strategy".into(),
        });
    }

    let totals = window_totals(rows);
    let ranked = rank_positive(&strategy_window_returns(rows));
    let sums = positive_sums(&ranked, top_n);

    let table: Vec<WindowSummary> = totals
        .into_iter()
        .map(|t| {
            let concentration = sums
                .get(&t.window_idx)
                .map_or(f64::NAN, |s| ratio_or_nan(s.top, s.total));
            WindowSummary {
                window_idx: t.window_idx,
                strat_return: t.strat_return,
                capital: t.capital,
                concentration,
                start_date: t.start_date,
                end_date: t.end_date,
            }
        })
        .collect();

    for (w, s) in &sums {
        trace!("[CONC] window {} top: {}", w, s.top_strategies.join(", "));
    }

    let undefined = table.iter().filter(|s| s.concentration.is_nan()).count();
    debug!(
        "[CONC] {} windows, top_n={}, {} without positive return",
        table.len(),
        top_n,
        undefined
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helpers::*;
    use crate::engine::windowing::assign_windows;

    fn windowed(capital: f64, window: usize, daily: &[&[(&str, f64)]]) -> Vec<WindowedRow> {
        assign_windows(&merged_days(d(2024, 1, 1), capital, daily), window).unwrap()
    }

    #[test]
    fn test_two_positive_strategies_top_one() {
        // Window 0 = days 0-1, window 1 = day 2
        let rows = windowed(
            1000.0,
            2,
            &[&[("A", 30.0), ("B", 10.0)], &[("A", 10.0), ("B", 10.0)], &[("A", 5.0), ("B", -5.0)]],
        );
        let table = concentration_table(&rows, 1).unwrap();
        assert_eq!(table.len(), 2);

        // A = 0.04, B = 0.02 → 0.04 / 0.06
        assert!((table[0].concentration - 0.04 / 0.06).abs() < 1e-12);
        assert!((table[0].strat_return - 0.06).abs() < 1e-12);
        assert!((table[0].capital - 1000.0).abs() < 1e-12);
        assert_eq!(table[0].start_date, d(2024, 1, 1));
        assert_eq!(table[0].end_date, d(2024, 1, 2));

        // Only A positive in window 1
        assert!((table[1].concentration - 1.0).abs() < 1e-12);
        assert!(table[1].strat_return.abs() < 1e-12);
        assert_eq!(table[1].start_date, d(2024, 1, 3));
        assert_eq!(table[1].end_date, d(2024, 1, 3));
    }

    #[test]
    fn test_no_positive_strategy_gives_nan() {
        let rows = windowed(1000.0, 1, &[&[("A", 5.0)], &[("A", -5.0), ("B", -1.0)], &[("A", 0.0)]]);
        let table = concentration_table(&rows, 3).unwrap();
        assert_eq!(table.len(), 3);
        assert!((table[0].concentration - 1.0).abs() < 1e-12);
        assert!(table[1].concentration.is_nan());
        assert!(table[2].concentration.is_nan());
        // Window index stays contiguous
        let idx: Vec<usize> = table.iter().map(|s| s.window_idx).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn test_fewer_positive_than_top_n() {
        let rows = windowed(100.0, 5, &[&[("A", 1.0), ("B", 2.0), ("C", -3.0)]]);
        let table = concentration_table(&rows, 3).unwrap();
        assert!((table[0].concentration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_concentration_bounded_and_denominator_matches() {
        let rows = windowed(
            1000.0,
            3,
            &[
                &[("A", 4.0), ("B", 3.0), ("C", 2.0), ("D", 1.0), ("E", -6.0)],
                &[("A", -1.0), ("B", 2.0), ("C", 7.0), ("D", 1.0), ("E", 3.0)],
                &[("A", 2.0), ("B", -9.0), ("C", 1.0), ("D", 0.5), ("E", 3.0)],
                &[("A", 1.0), ("B", 1.0)],
            ],
        );
        let returns = strategy_window_returns(&rows);
        let ranked = rank_positive(&returns);
        let sums = positive_sums(&ranked, 2);
        for (w, s) in &sums {
            let expected: f64 = returns
                .iter()
                .filter(|r| r.window_idx == *w && r.strat_return > 0.0)
                .map(|r| r.strat_return)
                .sum();
            assert!((s.total - expected).abs() < 1e-12, "window {}", w);
        }
        for s in concentration_table(&rows, 2).unwrap() {
            assert!(s.concentration >= 0.0 && s.concentration <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_rank_orders_desc_with_name_tiebreak() {
        let rows = windowed(1.0, 10, &[&[("Zeta", 2.0), ("Alpha", 2.0), ("Mid", 5.0), ("Neg", -1.0)]]);
        let ranked = rank_positive(&strategy_window_returns(&rows));
        let names: Vec<&str> = ranked.iter().map(|r| r.strategy.as_str()).collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zeta"]);

        let sums = positive_sums(&ranked, 2);
        assert_eq!(sums[&0].top_strategies, vec!["Mid".to_string(), "Alpha".to_string()]);
        assert!((sums[&0].top - 7.0).abs() < 1e-12);
        assert!((sums[&0].total - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_n_resets_per_window() {
        let rows = windowed(
            1.0,
            1,
            &[&[("A", 3.0), ("B", 2.0), ("C", 1.0)], &[("A", 1.0), ("B", 2.0), ("C", 3.0)]],
        );
        let ranked = rank_positive(&strategy_window_returns(&rows));
        let top: Vec<(usize, &str)> = top_n_per_window(&ranked, 1)
            .iter()
            .map(|r| (r.window_idx, r.strategy.as_str()))
            .collect();
        assert_eq!(top, vec![(0, "A"), (1, "C")]);
    }

    #[test]
    fn test_nan_returns_skipped_in_sums() {
        let mut rows = windowed(1000.0, 5, &[&[("A", 10.0)], &[("A", 10.0)]]);
        rows[0].strat_return = f64::NAN;
        rows[0].capital = None;
        let table = concentration_table(&rows, 3).unwrap();
        assert!((table[0].strat_return - 0.01).abs() < 1e-12);
        assert!((table[0].capital - 1000.0).abs() < 1e-12);
        assert!((table[0].concentration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_capital_missing() {
        let mut rows = windowed(1000.0, 5, &[&[("A", 10.0)]]);
        rows[0].strat_return = f64::NAN;
        rows[0].capital = None;
        let table = concentration_table(&rows, 3).unwrap();
        assert_eq!(table[0].strat_return, 0.0);
        assert!(table[0].capital.is_nan());
        assert!(table[0].concentration.is_nan());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        assert!(matches!(
            concentration_table(&[], 0),
            Err(PortfolioError::InvalidParameter { .. })
        ));
    }
}
