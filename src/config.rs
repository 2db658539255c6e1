use std::path::PathBuf;

use crate::error::{PortfolioError, Result};
use crate::frame::{validate_permutation, Permutation};
use crate::types::SUMMARY_COLUMNS;

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_PNL_TABLE: &str = "Interview Project Input";
pub const DEFAULT_CAPITAL_TABLE: &str = "Allocated Capital";

/// Moves Capital behind the dates: [Strat Return, Concentration, Start Date, End Date, Capital].
pub const DEFAULT_DISPLAY_ORDER: &str = "0,4,1,2,3";

/// Window sizing for the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortfolioParams {
    /// Period length in distinct calendar days.
    pub window: usize,
    /// Strategies counted in the concentration numerator.
    pub top_n: usize,
}

impl Default for PortfolioParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl PortfolioParams {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(PortfolioError::InvalidParameter {
                name: "window".into(),
                value: self.window.to_string(),
                reason: "must be a positive number of days".into(),
            });
        }
        if self.top_n == 0 {
            return Err(PortfolioError::InvalidParameter {
                name: "top_n".into(),
                value: self.top_n.to_string(),
                reason: "must select at least one strategy".into(),
            });
        }
        Ok(())
    }
}

/// Configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    // Input
    pub input_path: PathBuf,
    pub pnl_table: String,
    pub capital_table: String,

    // Output
    pub output_dir: PathBuf,
    pub display_order: String,

    // Windowing
    pub params: PortfolioParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data"),
            pnl_table: DEFAULT_PNL_TABLE.into(),
            capital_table: DEFAULT_CAPITAL_TABLE.into(),
            output_dir: PathBuf::from("output"),
            display_order: DEFAULT_DISPLAY_ORDER.into(),
            params: PortfolioParams::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input_path: std::env::var("PORTFOLIO_INPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),
            pnl_table: std::env::var("PNL_TABLE").unwrap_or(defaults.pnl_table),
            capital_table: std::env::var("CAPITAL_TABLE").unwrap_or(defaults.capital_table),
            output_dir: std::env::var("PORTFOLIO_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            display_order: std::env::var("DISPLAY_ORDER").unwrap_or(defaults.display_order),
            params: PortfolioParams {
                window: std::env::var("WINDOW")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_WINDOW),
                top_n: std::env::var("TOP_N")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TOP_N),
            },
        }
    }

    /// Check window sizing and that the display order parses.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        let perm = self.display_permutation()?;
        validate_permutation(perm.as_slice(), SUMMARY_COLUMNS.len())?;
        Ok(())
    }

    pub fn display_permutation(&self) -> Result<Permutation> {
        Ok(Permutation::parse(&self.display_order)?)
    }
}
