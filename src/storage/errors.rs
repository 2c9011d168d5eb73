//! Storage error types
//!
//! `StoreError` is what a transaction reports; the query pipeline passes it
//! through unchanged. `CodecError` covers converting records between their
//! typed and stored forms.

use thiserror::Error;

use crate::schema::ColumnType;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for record encoding and decoding
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised by a key-value transaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Transaction was aborted before or during the operation
    #[error("Transaction aborted: {0}")]
    Aborted(String),

    /// Key space cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Write attempted through a read-only handle
    #[error("Transaction is read-only")]
    ReadOnly,
}

/// Errors converting records to or from the store representation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Stored value is not a JSON object
    #[error("Record under '{key}' is not an object")]
    NotAnObject { key: String },

    /// Value does not match the column type
    #[error("Column '{column}' expects {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: String,
    },

    /// Stored date string is not RFC 3339
    #[error("Column '{column}' holds an invalid date '{value}'")]
    InvalidDate { column: String, value: String },

    /// Numbers must be finite to be stored
    #[error("Column '{column}' holds a non-finite number")]
    NonFiniteNumber { column: String },

    /// Column is not declared on the table
    #[error("Table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    /// Key cannot be built without every primary key value
    #[error("Primary key column '{column}' of table '{table}' has no value")]
    MissingPrimaryKey { table: String, column: String },

    /// Primary key value contains the key separator
    #[error("Primary key column '{column}' of table '{table}' holds '{value}', which contains '/'")]
    InvalidKeyComponent {
        table: String,
        column: String,
        value: String,
    },

    /// Two records of one write resolve to the same key, or the key is taken
    #[error("Key '{key}' of table '{table}' is already in use")]
    KeyConflict { table: String, key: String },
}
