//! Error types for case data ingestion.

use thiserror::Error;

/// Errors that abort a whole parse or export.
///
/// Malformed individual rows never produce one of these; they are reported
/// as [`RowError`](crate::RowError)s alongside the rows that did parse.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input holds no non-blank lines.
    #[error("input is empty")]
    EmptyInput,

    /// The header row yields no column names.
    #[error("header row has no columns")]
    NoColumns,

    /// Export delimiters must be single-byte.
    #[error("delimiter {0:?} must be an ASCII character")]
    InvalidDelimiter(char),

    /// The CSV writer failed.
    #[error("failed to write CSV: {0}")]
    Write(String),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Write(err.to_string())
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(IngestError::EmptyInput.to_string(), "input is empty");
        assert_eq!(
            IngestError::InvalidDelimiter('§').to_string(),
            "delimiter '§' must be an ASCII character"
        );
    }
}
