//! Windowed per-strategy returns and top-N return concentration.
//!
//! Reads the PnL and allocated-capital tables from a workbook (one sheet per
//! table) or a directory of exported sheets (`<table name>.csv`), prints the
//! per-window report, and writes CSV + JSON results.
//!
//! Usage:
//!   concentration [OPTIONS]
//!     --input <path>        Workbook file or CSV sheet directory (env PORTFOLIO_INPUT)
//!     --output <dir>        Output directory (env PORTFOLIO_OUTPUT)
//!     --window <days>       Window size in distinct days (env WINDOW, default 20)
//!     --top-n <n>           Strategies in the numerator (env TOP_N, default 3)
//!     --display-order <p>   Column permutation (env DISPLAY_ORDER, default 0,4,1,2,3)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use portfolio_concentration::loader::open_source;
use portfolio_concentration::telemetry::{init_logging, render_report, write_outputs};
use portfolio_concentration::{Config, Portfolio};

#[derive(Parser, Debug)]
#[command(name = "concentration")]
#[command(about = "Per-window strategy returns and top-N return concentration")]
struct Args {
    /// Workbook file (.xlsx/.xls/.ods) or directory of `<table>.csv` sheets
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for CSV/JSON results
    #[arg(long)]
    output: Option<PathBuf>,

    /// Window size in distinct calendar days
    #[arg(long)]
    window: Option<usize>,

    /// Number of top strategies counted in the concentration numerator
    #[arg(long)]
    top_n: Option<usize>,

    /// Column permutation for the display table, e.g. "0,4,1,2,3"
    #[arg(long)]
    display_order: Option<String>,

    /// Name of the PnL table
    #[arg(long)]
    pnl_table: Option<String>,

    /// Name of the allocated-capital table
    #[arg(long)]
    capital_table: Option<String>,

    /// Print the report without writing files
    #[arg(long)]
    no_write: bool,
}

impl Args {
    /// CLI flags override environment values.
    fn apply(self, mut config: Config) -> (Config, bool) {
        if let Some(v) = self.input {
            config.input_path = v;
        }
        if let Some(v) = self.output {
            config.output_dir = v;
        }
        if let Some(v) = self.window {
            config.params.window = v;
        }
        if let Some(v) = self.top_n {
            config.params.top_n = v;
        }
        if let Some(v) = self.display_order {
            config.display_order = v;
        }
        if let Some(v) = self.pnl_table {
            config.pnl_table = v;
        }
        if let Some(v) = self.capital_table {
            config.capital_table = v;
        }
        (config, self.no_write)
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    init_logging();

    let (config, no_write) = Args::parse().apply(Config::from_env());
    config.validate().context("invalid configuration")?;

    tracing::info!(
        "[MAIN] input={} window={}d top_n={}",
        config.input_path.display(),
        config.params.window,
        config.params.top_n
    );

    let source = open_source(&config.input_path)
        .with_context(|| format!("opening input '{}'", config.input_path.display()))?;
    let portfolio = Portfolio::from_source(source.as_ref(), &config).context("building portfolio")?;

    print!("{}", render_report(&portfolio));

    if !no_write {
        write_outputs(&portfolio, &config.output_dir)
            .with_context(|| format!("writing results to '{}'", config.output_dir.display()))?;
    }
    Ok(())
}
