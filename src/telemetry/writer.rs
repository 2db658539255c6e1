use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::engine::Portfolio;
use crate::error::Result;
use crate::frame::Frame;
use crate::types::WindowSummary;

pub const CONCENTRATION_CSV: &str = "concentration.csv";
pub const CONCENTRATION_JSON: &str = "concentration.json";
pub const FOLLOWING_CSV: &str = "following_positive.csv";
pub const FOLLOWING_JSON: &str = "following_positive.json";

/// Frame as CSV: index column first, then the frame's columns.
pub fn write_frame_csv<W: Write>(frame: &Frame, out: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    let mut header = vec![frame.index_name.clone()];
    header.extend(frame.columns.iter().cloned());
    w.write_record(&header)?;
    for (idx, row) in frame.index.iter().zip(&frame.rows) {
        let mut rec = vec![idx.to_string()];
        rec.extend(row.iter().map(|c| c.to_string()));
        w.write_record(&rec)?;
    }
    w.flush()?;
    Ok(())
}

/// Summary rows as a JSON array. NaN becomes `null`.
pub fn write_summary_json<W: Write>(rows: &[WindowSummary], out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, rows)?;
    Ok(())
}

/// Write both result tables as CSV and JSON under `dir`. Returns the paths written.
pub fn write_outputs(portfolio: &Portfolio, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let files = [
        (CONCENTRATION_CSV, CONCENTRATION_JSON, portfolio.table(), portfolio.summary()),
        (
            FOLLOWING_CSV,
            FOLLOWING_JSON,
            portfolio.following_positive_table(),
            portfolio.following_positive(),
        ),
    ];

    let mut written = Vec::with_capacity(4);
    for (csv_name, json_name, frame, rows) in files {
        let csv_path = dir.join(csv_name);
        write_frame_csv(frame, File::create(&csv_path)?)?;
        written.push(csv_path);

        let json_path = dir.join(json_name);
        let mut f = File::create(&json_path)?;
        write_summary_json(rows, &mut f)?;
        writeln!(f)?;
        written.push(json_path);
    }

    info!("[OUT] Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}
