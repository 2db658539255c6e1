use std::fmt::Write;

use crate::engine::Portfolio;
use crate::frame::{Cell, Frame};

fn fmt_cell(c: &Cell) -> String {
    match c {
        Cell::Float(v) if v.is_nan() => "NaN".into(),
        Cell::Float(v) => format!("{:.6}", v),
        other => other.to_string(),
    }
}

/// Fixed-width text rendering of a frame, index column first.
pub fn render_frame(frame: &Frame) -> String {
    let mut headers = vec![frame.index_name.clone()];
    headers.extend(frame.columns.iter().cloned());

    let body: Vec<Vec<String>> = frame
        .index
        .iter()
        .zip(&frame.rows)
        .map(|(idx, row)| {
            let mut line = vec![idx.to_string()];
            line.extend(row.iter().map(fmt_cell));
            line
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            body.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let head: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:>w$}", h, w = *w))
        .collect();
    let _ = writeln!(out, "{}", head.join(" │ "));
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("─┼─"));
    for line in &body {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:>w$}", c, w = *w))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" │ "));
    }
    out
}

/// Full report: header box, the per-window table, then the follow-on table.
pub fn render_report(portfolio: &Portfolio) -> String {
    let params = portfolio.params();
    let summary = portfolio.summary();
    let range = match (summary.first(), summary.last()) {
        (Some(f), Some(l)) => format!("{}..{}", f.start_date, l.end_date),
        _ => "no dates".into(),
    };
    let follow = portfolio.following_positive();
    let follow_neg = follow.iter().filter(|s| s.strat_return < 0.0).count();

    let mut out = String::new();
    let _ = writeln!(out, "╔═══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(out, "║  Return Concentration Report");
    let _ = writeln!(
        out,
        "║  Window: {}d │ Top N: {} │ Windows: {} ({})",
        params.window,
        params.top_n,
        summary.len(),
        range
    );
    let _ = writeln!(out, "╚═══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(out);
    out.push_str(&render_frame(portfolio.table()));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Windows following a positive window: {} ({} negative)",
        follow.len(),
        follow_neg
    );
    if !follow.is_empty() {
        out.push_str(&render_frame(portfolio.following_positive_table()));
    }
    out
}
