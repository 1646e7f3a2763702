//! The load → aggregate → report pipeline.
//!
//! [`run`] executes one report run end to end. The CSV is written and
//! confirmed before the HTML stage starts, so a failing HTML stage leaves
//! the CSV behind.

use crate::analysis;
use crate::config::Config;
use crate::error::PipelineError;
use crate::loader::{self, LoadOptions};
use crate::models::Artifacts;
use crate::report::{self, PlotlyRenderer};
use anyhow::Context;
use chrono::Utc;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output paths for an input log: `<base>_aggregate.csv` and
/// `<base>_aggregate.html`, where `<base>` is the input path without its
/// final extension.
pub fn output_paths(input: &Path) -> (PathBuf, PathBuf) {
    let base: OsString = input.with_extension("").into_os_string();

    let mut csv = base.clone();
    csv.push("_aggregate.csv");

    let mut html = base;
    html.push("_aggregate.html");

    (PathBuf::from(csv), PathBuf::from(html))
}

/// Run the full pipeline for one input log.
pub fn run(input: &Path, config: &Config) -> Result<Artifacts, PipelineError> {
    loader::check_input(input)?;

    let options = LoadOptions {
        delimiter: config.input.delimiter_byte()?,
        show_progress: config.input.show_progress,
    };
    let (csv_path, html_path) = output_paths(input);
    debug!("Outputs: {} and {}", csv_path.display(), html_path.display());

    // Samples are dropped once aggregated.
    let rows = {
        let samples = loader::load_samples(input, &options)?;
        analysis::aggregate(&samples)
    };
    let total_samples = analysis::total_samples(&rows);
    info!(
        "Aggregated {} samples into {} transactions",
        total_samples,
        rows.len()
    );

    report::write_aggregate_csv(&rows, &csv_path)?;
    println!("✅ Aggregate CSV report saved to: {}", csv_path.display());

    println!(
        "\n🐢 Top {} Slowest Transactions (by avg response time):",
        config.report.top_n
    );
    println!(
        "{}",
        report::format_preview(&analysis::slowest(&rows, config.report.top_n))
    );

    let renderer = PlotlyRenderer::new(config.report.plotly_cdn_url.clone());
    let html = report::generate_html_report(&rows, &config.report, &renderer, Utc::now())?;
    std::fs::write(&html_path, html)
        .with_context(|| format!("Failed to write HTML report: {}", html_path.display()))?;
    println!("✅ HTML report with charts saved to: {}", html_path.display());

    Ok(Artifacts {
        csv_path,
        html_path,
        rows: rows.len(),
        total_samples,
    })
}
