//! Aggregate CSV export.

use crate::models::AggregateRow;
use anyhow::{Context, Result};
use csv::Writer;
use std::path::Path;

/// Column order of the aggregate CSV.
pub const AGGREGATE_COLUMNS: [&str; 7] = [
    "label",
    "samples",
    "avg_resp_time",
    "min_resp_time",
    "max_resp_time",
    "error_pct",
    "throughput",
];

/// Write aggregate rows as CSV with a header row and no index column.
pub fn write_aggregate_csv(rows: &[AggregateRow], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV report: {}", path.display()))?;

    // The serializer derives the header from the first row.
    if rows.is_empty() {
        wtr.write_record(AGGREGATE_COLUMNS)?;
    }

    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Failed to write CSV row for '{}'", row.label))?;
    }

    wtr.flush()
        .with_context(|| format!("Failed to write CSV report: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_back(path: &Path) -> Vec<AggregateRow> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.deserialize::<AggregateRow>().map(|r| r.unwrap()).collect()
    }

    fn rows() -> Vec<AggregateRow> {
        vec![
            AggregateRow {
                label: "Checkout".to_string(),
                samples: 1,
                avg_resp_time: 200.0,
                min_resp_time: 200.0,
                max_resp_time: 200.0,
                error_pct: 0.0,
                throughput: 1.0,
            },
            AggregateRow {
                label: "Search, by name".to_string(),
                samples: 3,
                avg_resp_time: 166.67,
                min_resp_time: 100.0,
                max_resp_time: 250.5,
                error_pct: 33.33,
                throughput: 0.43,
            },
        ]
    }

    #[test]
    fn test_header_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_aggregate_csv(&rows(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "label,samples,avg_resp_time,min_resp_time,max_resp_time,error_pct,throughput"
        );
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let original = rows();
        write_aggregate_csv(&original, &path).unwrap();

        let restored = read_back(&path);
        assert_eq!(restored.len(), original.len());
        for (a, b) in original.iter().zip(&restored) {
            assert_eq!(a.label, b.label);
            assert_eq!(a.samples, b.samples);
            assert!((a.avg_resp_time - b.avg_resp_time).abs() < 0.01);
            assert!((a.min_resp_time - b.min_resp_time).abs() < 0.01);
            assert!((a.max_resp_time - b.max_resp_time).abs() < 0.01);
            assert!((a.error_pct - b.error_pct).abs() < 0.01);
            assert!((a.throughput - b.throughput).abs() < 0.01);
        }
    }

    #[test]
    fn test_empty_rows_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        write_aggregate_csv(&[], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), AGGREGATE_COLUMNS.join(","));
        assert!(read_back(&path).is_empty());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        let err = write_aggregate_csv(&rows(), &path).unwrap_err();
        assert!(err.to_string().contains("Failed to create CSV report"));
    }
}
