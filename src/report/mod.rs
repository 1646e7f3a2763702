//! Report writers.
//!
//! Serializes aggregate rows to CSV, renders the HTML report, and formats
//! the console preview of the slowest transactions.

pub mod chart;
pub mod csv_export;
pub mod generator;

pub use chart::PlotlyRenderer;
pub use csv_export::{write_aggregate_csv, AGGREGATE_COLUMNS};
pub use generator::generate_html_report;

use crate::models::AggregateRow;

/// Escape text for use in HTML element content and attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format rows as a right-aligned text table with a header line.
pub fn format_preview(rows: &[AggregateRow]) -> String {
    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|r| {
            [
                r.label.clone(),
                r.samples.to_string(),
                format!("{:.2}", r.avg_resp_time),
                format!("{:.2}", r.min_resp_time),
                format!("{:.2}", r.max_resp_time),
                format!("{:.2}", r.error_pct),
                format!("{:.2}", r.throughput),
            ]
        })
        .collect();

    let widths: Vec<usize> = AGGREGATE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:>width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut lines = vec![format_line(AGGREGATE_COLUMNS.to_vec())];
    for row in &cells {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }

    lines.join("\n")
}
