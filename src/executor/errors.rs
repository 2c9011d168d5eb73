//! Executor error types
//!
//! Error codes:
//! - RELKV_EXECUTION_FAILED (ERROR)
//! - RELKV_EXECUTION_NOT_IMPLEMENTED (ERROR)
//! - RELKV_EXECUTION_TYPE_MISMATCH (ERROR)
//! - RELKV_EXECUTION_STORE_FAILURE (ERROR)
//! - RELKV_DATA_CORRUPTION (FATAL)
//! - RELKV_EXECUTION_ROW_COLLISION (ERROR)
//! - RELKV_EXECUTION_LIMIT (ERROR)
//! - RELKV_EXECUTION_INVALID_CONFIG (ERROR)

use std::fmt;

use crate::filter::CompareOp;
use crate::schema::IncomparableTypes;
use crate::storage::{CodecError, StoreError};

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query failed, store is unaffected
    Error,
    /// Stored data cannot be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// General execution failure
    ExecutionFailed,
    /// Operator kind has no evaluator
    NotImplemented,
    /// Operands resolved to values of different types
    TypeMismatch,
    /// The transaction reported an error
    StoreFailure,
    /// Stored record does not decode with the table's column types (FATAL)
    DataCorruption,
    /// Join would overwrite an entry already in the row
    RowCollision,
    /// Operator output exceeded the configured row cap
    ExecutionLimit,
    /// Configuration document could not be parsed
    InvalidConfig,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::ExecutionFailed => "RELKV_EXECUTION_FAILED",
            ExecutorErrorCode::NotImplemented => "RELKV_EXECUTION_NOT_IMPLEMENTED",
            ExecutorErrorCode::TypeMismatch => "RELKV_EXECUTION_TYPE_MISMATCH",
            ExecutorErrorCode::StoreFailure => "RELKV_EXECUTION_STORE_FAILURE",
            ExecutorErrorCode::DataCorruption => "RELKV_DATA_CORRUPTION",
            ExecutorErrorCode::RowCollision => "RELKV_EXECUTION_ROW_COLLISION",
            ExecutorErrorCode::ExecutionLimit => "RELKV_EXECUTION_LIMIT",
            ExecutorErrorCode::InvalidConfig => "RELKV_EXECUTION_INVALID_CONFIG",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecutorErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug, Clone)]
pub struct ExecutorError {
    /// Error code
    code: ExecutorErrorCode,
    /// Human-readable message
    message: String,
    /// Store key involved, if any
    key: Option<String>,
    /// Underlying transaction error, unchanged
    store: Option<StoreError>,
}

impl ExecutorError {
    /// Create a general execution failure
    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::ExecutionFailed,
            message: reason.into(),
            key: None,
            store: None,
        }
    }

    /// Create an operator not implemented error
    pub fn not_implemented(operator: &str) -> Self {
        Self {
            code: ExecutorErrorCode::NotImplemented,
            message: format!("Operator {} has no evaluator", operator),
            key: None,
            store: None,
        }
    }

    /// Create a type mismatch error for a comparison
    pub fn type_mismatch(op: CompareOp, cause: IncomparableTypes) -> Self {
        Self {
            code: ExecutorErrorCode::TypeMismatch,
            message: format!("{}: {}", op.op_name(), cause),
            key: None,
            store: None,
        }
    }

    /// Wrap a transaction error
    pub fn store(err: StoreError) -> Self {
        Self {
            code: ExecutorErrorCode::StoreFailure,
            message: err.to_string(),
            key: None,
            store: Some(err),
        }
    }

    /// Create a data corruption error for the record stored under `key`
    pub fn data_corruption(key: impl Into<String>, cause: &CodecError) -> Self {
        let k = key.into();
        Self {
            code: ExecutorErrorCode::DataCorruption,
            message: format!("Record '{}' cannot be decoded: {}", k, cause),
            key: Some(k),
            store: None,
        }
    }

    /// Create a row collision error
    pub fn row_collision(table: &str) -> Self {
        Self {
            code: ExecutorErrorCode::RowCollision,
            message: format!(
                "Table '{}' appears on both sides of a join; use an alias",
                table
            ),
            key: None,
            store: None,
        }
    }

    /// Create an execution limit error
    pub fn limit_exceeded(operator: &str, limit: usize) -> Self {
        Self {
            code: ExecutorErrorCode::ExecutionLimit,
            message: format!("{} produced more than {} rows", operator, limit),
            key: None,
            store: None,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::InvalidConfig,
            message: reason.into(),
            key: None,
            store: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the store key if applicable
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the transaction error this wraps, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        self.store.as_ref()
    }

    /// Returns true if this error indicates corrupted data
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.store
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<StoreError> for ExecutorError {
    fn from(err: StoreError) -> Self {
        ExecutorError::store(err)
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn test_error_codes() {
        assert_eq!(ExecutorErrorCode::NotImplemented.code(), "RELKV_EXECUTION_NOT_IMPLEMENTED");
        assert_eq!(ExecutorErrorCode::DataCorruption.code(), "RELKV_DATA_CORRUPTION");
        assert_eq!(ExecutorErrorCode::ExecutionLimit.code(), "RELKV_EXECUTION_LIMIT");
    }

    #[test]
    fn test_corruption_is_fatal() {
        let cause = CodecError::NotAnObject { key: "users/1".into() };
        let err = ExecutorError::data_corruption("users/1", &cause);
        assert!(err.is_fatal());
        assert_eq!(err.key(), Some("users/1"));
        assert!(err.to_string().starts_with("[FATAL] RELKV_DATA_CORRUPTION"));
    }

    #[test]
    fn test_store_error_preserved() {
        let err: ExecutorError = StoreError::Aborted("conflict".into()).into();
        assert_eq!(err.code(), ExecutorErrorCode::StoreFailure);
        assert_eq!(err.store_error(), Some(&StoreError::Aborted("conflict".into())));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = ExecutorError::type_mismatch(
            CompareOp::Lt,
            IncomparableTypes {
                left: ColumnType::Number,
                right: ColumnType::String,
            },
        );
        assert_eq!(err.code(), ExecutorErrorCode::TypeMismatch);
        assert!(err.message().contains("cannot compare number with string"));
    }
}
