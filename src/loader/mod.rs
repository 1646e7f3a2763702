//! Results log loader.
//!
//! Reads a JTL results log (delimited text with a header row) into typed
//! [`Sample`] records. Input presence and the required columns are checked
//! eagerly; anything malformed past that point is an unclassified failure.

use crate::error::PipelineError;
use crate::models::{normalize_success, Sample};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns every results log must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["label", "elapsed"];

const TIMESTAMP_COLUMN: &str = "timeStamp";
const SUCCESS_COLUMN: &str = "success";

/// Options for loading a results log.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether to show a spinner while reading.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            show_progress: false,
        }
    }
}

/// Positions of the columns the loader reads.
#[derive(Debug, Clone, PartialEq)]
struct ColumnIndex {
    label: usize,
    elapsed: usize,
    timestamp: Option<usize>,
    success: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, PipelineError> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}'))
            .collect();
        let find = |name: &str| names.iter().position(|h| *h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| find(*c).is_none())
            .map(|c| c.to_string())
            .collect();

        match (find("label"), find("elapsed")) {
            (Some(label), Some(elapsed)) => Ok(Self {
                label,
                elapsed,
                timestamp: find(TIMESTAMP_COLUMN),
                success: find(SUCCESS_COLUMN),
            }),
            _ => Err(PipelineError::Schema { missing }),
        }
    }
}

/// Fail unless `path` is an existing, non-empty file.
pub fn check_input(path: &Path) -> Result<(), PipelineError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(PipelineError::MissingInput(path.to_path_buf())),
    }
}

/// Load every sample from a results log, preserving row order.
pub fn load_samples(path: &Path, options: &LoadOptions) -> Result<Vec<Sample>, PipelineError> {
    check_input(path)?;

    info!("Loading samples from: {}", path.display());

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open results log: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();
    let columns = ColumnIndex::from_headers(&headers)?;
    debug!("Column layout: {:?}", columns);

    if columns.timestamp.is_none() {
        warn!("No '{}' column; throughput will use a 1s window", TIMESTAMP_COLUMN);
    }
    if columns.success.is_none() {
        warn!("No '{}' column; every sample will count as an error", SUCCESS_COLUMN);
    }

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] Loading samples: {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Some(pb)
    } else {
        None
    };

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    let mut record = StringRecord::new();

    while reader
        .read_record(&mut record)
        .context("Failed to read sample record")?
    {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match parse_record(&record, &columns)
            .with_context(|| format!("Malformed sample on line {}", line))?
        {
            Some(sample) => samples.push(sample),
            None => skipped += 1,
        }

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    if skipped > 0 {
        warn!("Skipped {} samples with an empty label", skipped);
    }
    info!("Loaded {} samples", samples.len());

    Ok(samples)
}

/// Parse one record. Returns `None` for rows without a label.
fn parse_record(record: &StringRecord, columns: &ColumnIndex) -> Result<Option<Sample>> {
    let label = record.get(columns.label).unwrap_or("");
    if label.is_empty() {
        return Ok(None);
    }

    let elapsed = parse_elapsed(record.get(columns.elapsed).unwrap_or(""))?;

    let timestamp = match columns.timestamp.and_then(|i| record.get(i)) {
        Some(cell) if !cell.trim().is_empty() => Some(parse_epoch_millis(cell)?),
        _ => None,
    };

    let success = normalize_success(columns.success.and_then(|i| record.get(i)));

    Ok(Some(Sample {
        label: label.to_string(),
        elapsed,
        timestamp,
        success,
    }))
}

/// Parse an elapsed time in milliseconds.
fn parse_elapsed(cell: &str) -> Result<f64> {
    let value: f64 = cell
        .trim()
        .parse()
        .with_context(|| format!("Invalid elapsed value {:?}", cell))?;

    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("Elapsed must be a non-negative number, got {:?}", cell);
    }

    Ok(value)
}

/// Parse an integer epoch-milliseconds timestamp.
fn parse_epoch_millis(cell: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = cell
        .trim()
        .parse()
        .with_context(|| format!("Invalid timeStamp value {:?}", cell))?;

    DateTime::from_timestamp_millis(millis)
        .with_context(|| format!("timeStamp out of range: {}", millis))
}
