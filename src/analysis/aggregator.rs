//! Per-transaction aggregation and statistics.
//!
//! This module groups raw samples by label and derives the aggregate
//! row for each group. Rounding happens once, when a group is finished.

use crate::models::{AggregateRow, Sample};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Lower bound of a label's active window, in seconds.
pub const MIN_DURATION_SECS: f64 = 1.0;

/// Running statistics for one label.
#[derive(Debug, Clone)]
struct LabelStats {
    count: u64,
    elapsed_sum: f64,
    min: f64,
    max: f64,
    errors: u64,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl LabelStats {
    fn new(sample: &Sample) -> Self {
        let mut stats = Self {
            count: 0,
            elapsed_sum: 0.0,
            min: sample.elapsed,
            max: sample.elapsed,
            errors: 0,
            start: None,
            end: None,
        };
        stats.record(sample);
        stats
    }

    fn record(&mut self, sample: &Sample) {
        self.count += 1;
        self.elapsed_sum += sample.elapsed;
        self.min = self.min.min(sample.elapsed);
        self.max = self.max.max(sample.elapsed);

        if !sample.is_success() {
            self.errors += 1;
        }

        if let Some(ts) = sample.timestamp {
            self.start = Some(self.start.map_or(ts, |s| s.min(ts)));
            self.end = Some(self.end.map_or(ts, |e| e.max(ts)));
        }
    }

    /// Active window in seconds, floored at [`MIN_DURATION_SECS`].
    fn duration_secs(&self) -> f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                let secs = (end - start).num_milliseconds() as f64 / 1000.0;
                secs.max(MIN_DURATION_SECS)
            }
            _ => MIN_DURATION_SECS,
        }
    }

    fn finish(self, label: String) -> AggregateRow {
        let samples = self.count as f64;
        // Summation error can push the mean just outside [min, max].
        let avg = (self.elapsed_sum / samples).clamp(self.min, self.max);
        let error_pct = 100.0 * self.errors as f64 / samples;
        let throughput = samples / self.duration_secs();

        AggregateRow {
            label,
            samples: self.count,
            avg_resp_time: round2(avg),
            min_resp_time: round2(self.min),
            max_resp_time: round2(self.max),
            error_pct: round2(error_pct),
            throughput: round2(throughput),
        }
    }
}

/// Aggregate samples into one row per distinct label, sorted by label.
pub fn aggregate(samples: &[Sample]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<&str, LabelStats> = BTreeMap::new();

    for sample in samples {
        match groups.get_mut(sample.label.as_str()) {
            Some(stats) => stats.record(sample),
            None => {
                groups.insert(sample.label.as_str(), LabelStats::new(sample));
            }
        }
    }

    groups
        .into_iter()
        .map(|(label, stats)| stats.finish(label.to_string()))
        .collect()
}

/// Round to two decimal places, ties to even.
///
/// Values too large to scale are returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / 100.0
}

/// Rows ordered by average response time, slowest first.
///
/// The sort is stable, so ties keep their aggregate order.
pub fn sort_by_avg_desc(rows: &[AggregateRow]) -> Vec<AggregateRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        b.avg_resp_time
            .partial_cmp(&a.avg_resp_time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

/// The `n` slowest transactions by average response time.
pub fn slowest(rows: &[AggregateRow], n: usize) -> Vec<AggregateRow> {
    let mut sorted = sort_by_avg_desc(rows);
    sorted.truncate(n);
    sorted
}

/// Total number of samples behind a set of rows.
pub fn total_samples(rows: &[AggregateRow]) -> u64 {
    rows.iter().map(|r| r.samples).sum()
}
