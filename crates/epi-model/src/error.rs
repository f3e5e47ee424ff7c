//! Error types for the case data model.

use thiserror::Error;

use crate::column::ColumnType;

/// Errors raised when a dataset, record, or value violates the schema.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// Record identifiers must be non-empty.
    #[error("invalid record id: {0:?}")]
    InvalidRecordId(String),

    /// Two columns share the same key.
    #[error("duplicate column key: {0}")]
    DuplicateColumnKey(String),

    /// Two records share the same identifier.
    #[error("duplicate record id: {0}")]
    DuplicateRecordId(String),

    /// A record carries a key the dataset does not declare.
    #[error("record {record} has unknown column '{key}'")]
    UnknownColumn { record: String, key: String },

    /// A value does not type-check against its column.
    #[error("record {record}: column '{key}' expects {expected}, found {found}")]
    TypeMismatch {
        record: String,
        key: String,
        expected: ColumnType,
        found: &'static str,
    },

    /// A calendar string could not be parsed.
    #[error("invalid calendar date: {0:?}")]
    InvalidDate(String),

    /// Unknown column type name.
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
