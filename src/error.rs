//! Error types for secat
//!
//! This module defines all error types used by the catalog reader and writer.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for secat
#[derive(Error, Debug)]
pub enum Error {
    // ========== Header Errors ==========
    #[error("Header error: line {line}: {reason}")]
    InvalidHeader { line: usize, reason: String },

    // ========== Data Errors ==========
    #[error(
        "Parse error: row {row}, column {column} ('{name}'): cannot read '{value}' as {expected}"
    )]
    ParseError {
        row: usize,
        column: usize,
        name: String,
        value: String,
        expected: String,
    },

    #[error("Parse error: row {row} has no value for column {column}")]
    MissingField { row: usize, column: usize },

    // ========== Catalog Errors ==========
    #[error("Catalog error: column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Catalog error: column '{0}' already exists")]
    ColumnAlreadyExists(String),

    #[error("Catalog error: column '{name}' has {found} values, catalog has {expected} rows")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Catalog error: invalid column name '{0}'")]
    InvalidColumnName(String),

    #[error("Catalog error: value '{value}' in column '{name}', row {row} contains whitespace")]
    InvalidValue {
        name: String,
        row: usize,
        value: String,
    },

    #[error("Catalog error: row {row} out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    // ========== Format Errors ==========
    #[error("Format error: invalid print format '{0}'")]
    InvalidFormat(String),

    // ========== Output Errors ==========
    #[error("Output error: '{}' already exists, pass overwrite to replace it", .0.display())]
    DestinationExists(PathBuf),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for secat operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ColumnNotFound("mag_auto".to_string());
        assert_eq!(err.to_string(), "Catalog error: column 'mag_auto' not found");

        let err = Error::ColumnLengthMismatch {
            name: "flag".to_string(),
            expected: 10,
            found: 9,
        };
        assert_eq!(
            err.to_string(),
            "Catalog error: column 'flag' has 9 values, catalog has 10 rows"
        );

        let err = Error::InvalidValue {
            name: "label".to_string(),
            row: 2,
            value: "a b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Catalog error: value 'a b' in column 'label', row 2 contains whitespace"
        );

        let err = Error::DestinationExists(PathBuf::from("out.cat"));
        assert!(err.to_string().contains("'out.cat' already exists"));
    }
}
