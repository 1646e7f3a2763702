//! Data models for the report pipeline.
//!
//! This module contains the raw sample record produced by the loader,
//! the per-transaction aggregate row, and the artifacts of a finished run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The only success indicator value that counts as a successful sample.
pub const CANONICAL_SUCCESS: &str = "true";

/// One raw load-test request record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Transaction label the sample belongs to.
    pub label: String,
    /// Elapsed time in milliseconds.
    pub elapsed: f64,
    /// Instant the sample started, if the log carries one.
    pub timestamp: Option<DateTime<Utc>>,
    /// Success indicator in its normalized textual form.
    pub success: String,
}

impl Sample {
    /// Returns true if this sample counts as a success.
    pub fn is_success(&self) -> bool {
        is_success(&self.success)
    }
}

/// Normalize a raw success cell to its textual form.
///
/// Missing cells become the empty string. The value is otherwise kept
/// verbatim: no trimming, no case folding, no boolean parsing.
pub fn normalize_success(raw: Option<&str>) -> String {
    raw.map(str::to_string).unwrap_or_default()
}

/// Strict success policy: only the exact string `"true"` is a success.
pub fn is_success(indicator: &str) -> bool {
    indicator == CANONICAL_SUCCESS
}

/// Summary statistics for one transaction label.
///
/// Field order is the column order of the aggregate CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Transaction label.
    pub label: String,
    /// Number of samples with this label.
    pub samples: u64,
    /// Mean elapsed time (ms).
    pub avg_resp_time: f64,
    /// Minimum elapsed time (ms).
    pub min_resp_time: f64,
    /// Maximum elapsed time (ms).
    pub max_resp_time: f64,
    /// Percentage of samples that did not succeed.
    pub error_pct: f64,
    /// Samples per second over the label's active window.
    pub throughput: f64,
}

/// Files produced by a successful run.
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Path of the aggregate CSV.
    pub csv_path: PathBuf,
    /// Path of the HTML report.
    pub html_path: PathBuf,
    /// Number of aggregate rows written.
    pub rows: usize,
    /// Number of samples that went into the aggregate.
    pub total_samples: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_success() {
        assert_eq!(normalize_success(Some("true")), "true");
        assert_eq!(normalize_success(Some(" true")), " true");
        assert_eq!(normalize_success(Some("1")), "1");
        assert_eq!(normalize_success(None), "");
    }

    #[test]
    fn test_is_success_is_strict() {
        assert!(is_success("true"));
        assert!(!is_success("True"));
        assert!(!is_success("TRUE"));
        assert!(!is_success("1"));
        assert!(!is_success("false"));
        assert!(!is_success(""));
        assert!(!is_success("true "));
    }

    #[test]
    fn test_sample_is_success() {
        let sample = Sample {
            label: "Login".to_string(),
            elapsed: 120.0,
            timestamp: None,
            success: normalize_success(Some("true")),
        };
        assert!(sample.is_success());

        let failed = Sample {
            success: normalize_success(None),
            ..sample
        };
        assert!(!failed.is_success());
    }
}
