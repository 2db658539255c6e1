use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use portfolio_concentration::loader::CsvDirSource;
use portfolio_concentration::telemetry::write_outputs;
use portfolio_concentration::types::{COL_CAPITAL, COL_CONCENTRATION, COL_STRAT_RETURN};
use portfolio_concentration::{Config, Portfolio, PortfolioError, PortfolioParams};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn write_sheets(dir: &Path, pnl: &str, capital: &str) {
    fs::write(dir.join("Interview Project Input.csv"), pnl).unwrap();
    fs::write(dir.join("Allocated Capital.csv"), capital).unwrap();
}

fn config(dir: &Path, window: usize, top_n: usize) -> Config {
    Config {
        input_path: dir.to_path_buf(),
        output_dir: dir.join("out"),
        params: PortfolioParams { window, top_n },
        ..Config::default()
    }
}

/// Two strategies over three days, constant capital, window = 2, top_n = 1.
#[test]
fn test_three_days_two_strategies() {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(
        dir.path(),
        "Date,Strategy, PnL \n\
         2024-01-03,A,4\n\
         2024-01-01,A,10\n\
         2024-01-01,B,30\n\
         2024-01-02,A,10\n\
         2024-01-02,B,10\n\
         2024-01-03,B,-2\n",
        "Date,Capital\n2024-01-01,1000\n",
    );
    let cfg = config(dir.path(), 2, 1);
    let src = CsvDirSource::open(dir.path()).unwrap();
    let p = Portfolio::from_source(&src, &cfg).unwrap();

    let s = p.summary();
    assert_eq!(s.len(), 2);
    assert_eq!((s[0].start_date, s[0].end_date), (d(2024, 1, 1), d(2024, 1, 2)));
    assert_eq!((s[1].start_date, s[1].end_date), (d(2024, 1, 3), d(2024, 1, 3)));

    // Window 0: A = 0.02, B = 0.04, both positive → 0.04 / 0.06
    assert!((s[0].concentration - 0.04 / 0.06).abs() < 1e-12);
    assert!((s[0].strat_return - 0.06).abs() < 1e-12);
    // Window 1: only A positive
    assert!((s[1].concentration - 1.0).abs() < 1e-12);
    assert!((s[1].strat_return - 0.002).abs() < 1e-12);

    // Window 1 is last and positive: only it follows window 0
    let follow = p.following_positive();
    assert_eq!(follow.len(), 1);
    assert_eq!(follow[0].window_idx, 1);

    let t = p.table();
    assert_eq!(t.columns[0], COL_STRAT_RETURN);
    assert_eq!(t.columns[1], COL_CONCENTRATION);
    assert_eq!(t.columns[4], COL_CAPITAL);
    assert_eq!(t.index, vec![0, 1]);

    let written = write_outputs(&p, &cfg.output_dir).unwrap();
    assert_eq!(written.len(), 4);
}

/// Capital only known from the third day: earlier rows carry NaN returns.
#[test]
fn test_capital_missing_before_first_value() {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(
        dir.path(),
        "Date,Strategy, PnL \n\
         2024-03-01,A,5\n\
         2024-03-02,A,5\n\
         2024-03-03,A,5\n\
         2024-03-04,A,5\n",
        "Date,Capital\n2024-03-03,500\n2024-02-01,\n",
    );
    let src = CsvDirSource::open(dir.path()).unwrap();
    let p = Portfolio::from_source(&src, &config(dir.path(), 20, 3)).unwrap();

    let w = p.windowed();
    assert!(w[0].capital.is_none() && w[0].strat_return.is_nan());
    assert!(w[1].capital.is_none() && w[1].strat_return.is_nan());
    assert_eq!(w[3].capital, Some(500.0));
    assert!((p.summary()[0].strat_return - 0.02).abs() < 1e-12);
    assert!((p.summary()[0].capital - 500.0).abs() < 1e-12);
}

/// Windows where no strategy made money keep a NaN concentration.
#[test]
fn test_losing_window_has_nan_concentration() {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(
        dir.path(),
        "Date,Strategy,PnL\n\
         2024-01-01,A,10\n\
         2024-01-02,A,-10\n\
         2024-01-02,B,-5\n\
         2024-01-03,A,1\n",
        "Date,Capital\n2024-01-01,100\n",
    );
    let src = CsvDirSource::open(dir.path()).unwrap();
    let p = Portfolio::from_source(&src, &config(dir.path(), 1, 3)).unwrap();

    let s = p.summary();
    assert_eq!(s.len(), 3);
    assert!(s[1].concentration.is_nan());
    assert!(!s[0].concentration.is_nan() && !s[2].concentration.is_nan());

    // Window 0 positive → window 1 (negative) follows; window 2 positive but last.
    let follow = p.following_positive();
    assert_eq!(follow.len(), 1);
    assert_eq!(follow[0].window_idx, 1);
    assert!(follow[0].strat_return < 0.0);
    assert_eq!(p.following_positive_table().index, vec![0]);
}

#[test]
fn test_malformed_date_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(
        dir.path(),
        "Date,Strategy,PnL\n2024-01-01,A,1\n2024-02-30,A,1\n",
        "Date,Capital\n2024-01-01,100\n",
    );
    let src = CsvDirSource::open(dir.path()).unwrap();
    match Portfolio::from_source(&src, &config(dir.path(), 20, 3)) {
        Err(PortfolioError::DateParse { row, value, .. }) => {
            assert_eq!(row, 1);
            assert_eq!(value, "2024-02-30");
        }
        other => panic!("expected DateParse, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_sheet_is_named() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Interview Project Input.csv"), "Date,Strategy,PnL\n").unwrap();
    let src = CsvDirSource::open(dir.path()).unwrap();
    match Portfolio::from_source(&src, &config(dir.path(), 20, 3)) {
        Err(PortfolioError::MissingTable { name, available }) => {
            assert_eq!(name, "Allocated Capital");
            assert_eq!(available, vec!["Interview Project Input".to_string()]);
        }
        other => panic!("expected MissingTable, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_empty_pnl_sheet() {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(dir.path(), "Date,Strategy,PnL\n", "Date,Capital\n2024-01-01,100\n");
    let src = CsvDirSource::open(dir.path()).unwrap();
    let p = Portfolio::from_source(&src, &config(dir.path(), 20, 3)).unwrap();
    assert!(p.summary().is_empty());
    assert!(p.following_positive().is_empty());
}
