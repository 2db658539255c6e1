use tracing::info;

use crate::config::{Config, PortfolioParams, DEFAULT_DISPLAY_ORDER};
use crate::engine::concentration::concentration_table;
use crate::engine::follow_on::following_positive;
use crate::engine::windowing::assign_windows;
use crate::error::Result;
use crate::frame::{reorder_columns, Frame, Permutation};
use crate::loader::{load_inputs, merge_pnl_capital, TableSource};
use crate::types::{
    positional_frame, summary_frame, CapitalRecord, MergedRow, PnlRecord, WindowSummary, WindowedRow,
};

/// Every pipeline stage, computed once at construction and read-only after.
#[derive(Clone, Debug)]
pub struct Portfolio {
    params: PortfolioParams,
    merged: Vec<MergedRow>,
    windowed: Vec<WindowedRow>,
    summary: Vec<WindowSummary>,
    table: Frame,
    following_positive: Vec<WindowSummary>,
    following_positive_table: Frame,
}

impl Portfolio {
    /// Load both tables named in `config` from `source` and run the pipeline.
    pub fn from_source(source: &dyn TableSource, config: &Config) -> Result<Self> {
        config.validate()?;
        let (pnl, capital) = load_inputs(source, &config.pnl_table, &config.capital_table)?;
        Self::build(pnl, capital, config.params, &config.display_permutation()?)
    }

    /// Run the pipeline on typed records with the default display order.
    pub fn from_records(
        pnl: Vec<PnlRecord>,
        capital: Vec<CapitalRecord>,
        params: PortfolioParams,
    ) -> Result<Self> {
        let perm = Permutation::parse(DEFAULT_DISPLAY_ORDER)?;
        Self::build(pnl, capital, params, &perm)
    }

    pub fn build(
        pnl: Vec<PnlRecord>,
        capital: Vec<CapitalRecord>,
        params: PortfolioParams,
        display: &Permutation,
    ) -> Result<Self> {
        params.validate()?;

        let merged = merge_pnl_capital(pnl, capital);
        let windowed = assign_windows(&merged, params.window)?;
        let summary = concentration_table(&windowed, params.top_n)?;
        let table = reorder_columns(&summary_frame(&summary), display.as_slice())?;
        let following_positive = following_positive(&summary)?;
        let following_positive_table =
            reorder_columns(&positional_frame(&following_positive), display.as_slice())?;

        info!(
            "[CONC] {} rows → {} windows (window={}d, top_n={}), {} follow positive windows",
            merged.len(),
            summary.len(),
            params.window,
            params.top_n,
            following_positive.len()
        );

        Ok(Self {
            params,
            merged,
            windowed,
            summary,
            table,
            following_positive,
            following_positive_table,
        })
    }

    pub fn params(&self) -> PortfolioParams {
        self.params
    }

    pub fn merged(&self) -> &[MergedRow] {
        &self.merged
    }

    pub fn windowed(&self) -> &[WindowedRow] {
        &self.windowed
    }

    /// Typed per-window results, Capital included.
    pub fn summary(&self) -> &[WindowSummary] {
        &self.summary
    }

    /// Per-window results in display column order, indexed by window index.
    pub fn table(&self) -> &Frame {
        &self.table
    }

    pub fn following_positive(&self) -> &[WindowSummary] {
        &self.following_positive
    }

    /// `following_positive` in display column order, indexed from 0.
    pub fn following_positive_table(&self) -> &Frame {
        &self.following_positive_table
    }
}
