//! Pipeline error taxonomy.
//!
//! Input and schema problems are detected eagerly and carry tailored
//! messages. Anything else is wrapped as an unclassified failure with
//! the underlying cause chain.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a report run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input path does not exist or the file is empty.
    #[error("'{}' is missing or empty.", .0.display())]
    MissingInput(PathBuf),

    /// A required column is absent from the header row.
    #[error("Required columns not found in JTL CSV (missing: {}).", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// Any other failure: malformed fields, output I/O, chart rendering.
    #[error("Failed to parse and generate report: {0:#}")]
    Unclassified(#[from] anyhow::Error),
}

impl PipelineError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Short name of the error class, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MissingInput(_) => "MissingInputError",
            PipelineError::Schema { .. } => "SchemaError",
            PipelineError::Unclassified(_) => "UnclassifiedPipelineError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_missing_input_message() {
        let err = PipelineError::MissingInput(PathBuf::from("results.jtl"));
        let msg = err.to_string();
        assert!(msg.contains("results.jtl"));
        assert!(msg.contains("missing or empty"));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.kind(), "MissingInputError");
    }

    #[test]
    fn test_schema_message_lists_columns() {
        let err = PipelineError::Schema {
            missing: vec!["label".to_string(), "elapsed".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Required columns not found"));
        assert!(msg.contains("label, elapsed"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_unclassified_keeps_cause_chain() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("disk full"));
        let err: PipelineError = inner.context("Failed to write CSV").unwrap_err().into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to write CSV"));
        assert!(msg.contains("disk full"));
        assert_eq!(err.kind(), "UnclassifiedPipelineError");
    }
}
