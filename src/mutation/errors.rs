//! Mutation error types
//!
//! Error codes:
//! - RELKV_MUTATION_UNKNOWN_COLUMN (REJECT)
//! - RELKV_MUTATION_TYPE_MISMATCH (REJECT)
//! - RELKV_MUTATION_MISSING_PRIMARY_KEY (REJECT)
//! - RELKV_MUTATION_INVALID_VALUE (REJECT)
//! - RELKV_MUTATION_KEY_CONFLICT (REJECT)
//! - RELKV_MUTATION_QUERY_REJECTED (REJECT)
//! - RELKV_MUTATION_EXECUTION_FAILED (ERROR, FATAL on corruption)
//! - RELKV_MUTATION_STORE_FAILURE (ERROR)

use std::fmt;

use crate::executor::ExecutorError;
use crate::planner::PlannerError;
use crate::storage::{CodecError, StoreError};

/// Severity levels for mutation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing was written
    Reject,
    /// Operation failed; the transaction should be discarded
    Error,
    /// Stored data cannot be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Mutation-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationErrorCode {
    /// Value supplied for a column the table does not declare
    UnknownColumn,
    /// Value does not match its column type
    TypeMismatch,
    /// Primary key value absent or null
    MissingPrimaryKey,
    /// Value cannot be stored (non-finite number, separator in a key value)
    InvalidValue,
    /// Written key is already held by another record
    KeyConflict,
    /// Row-locating query failed validation
    QueryRejected,
    /// Row-locating query failed during execution
    ExecutionFailed,
    /// Transaction write failed
    StoreFailure,
}

impl MutationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            MutationErrorCode::UnknownColumn => "RELKV_MUTATION_UNKNOWN_COLUMN",
            MutationErrorCode::TypeMismatch => "RELKV_MUTATION_TYPE_MISMATCH",
            MutationErrorCode::MissingPrimaryKey => "RELKV_MUTATION_MISSING_PRIMARY_KEY",
            MutationErrorCode::InvalidValue => "RELKV_MUTATION_INVALID_VALUE",
            MutationErrorCode::KeyConflict => "RELKV_MUTATION_KEY_CONFLICT",
            MutationErrorCode::QueryRejected => "RELKV_MUTATION_QUERY_REJECTED",
            MutationErrorCode::ExecutionFailed => "RELKV_MUTATION_EXECUTION_FAILED",
            MutationErrorCode::StoreFailure => "RELKV_MUTATION_STORE_FAILURE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            MutationErrorCode::ExecutionFailed | MutationErrorCode::StoreFailure => {
                Severity::Error
            }
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for MutationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error from another subsystem that caused a mutation to fail
#[derive(Debug, Clone)]
pub enum MutationCause {
    Codec(CodecError),
    Planner(PlannerError),
    Executor(ExecutorError),
    Store(StoreError),
}

/// Mutation error type with full context
#[derive(Debug, Clone)]
pub struct MutationError {
    /// Error code
    code: MutationErrorCode,
    /// Human-readable message
    message: String,
    /// Underlying error
    cause: MutationCause,
}

impl MutationError {
    /// Returns the error code
    pub fn code(&self) -> MutationErrorCode {
        self.code
    }

    /// Returns the severity level; corruption found while locating rows is fatal
    pub fn severity(&self) -> Severity {
        match &self.cause {
            MutationCause::Executor(e) if e.is_fatal() => Severity::Fatal,
            _ => self.code.severity(),
        }
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &MutationCause {
        &self.cause
    }

    /// Returns the planner error if the locating query was rejected
    pub fn planner_error(&self) -> Option<&PlannerError> {
        match &self.cause {
            MutationCause::Planner(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the executor error if the locating query failed
    pub fn executor_error(&self) -> Option<&ExecutorError> {
        match &self.cause {
            MutationCause::Executor(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the transaction error, whether raised by a write or a read
    pub fn store_error(&self) -> Option<&StoreError> {
        match &self.cause {
            MutationCause::Store(e) => Some(e),
            MutationCause::Executor(e) => e.store_error(),
            _ => None,
        }
    }
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for MutationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            MutationCause::Codec(e) => Some(e),
            MutationCause::Planner(e) => Some(e),
            MutationCause::Executor(e) => Some(e),
            MutationCause::Store(e) => Some(e),
        }
    }
}

impl From<CodecError> for MutationError {
    fn from(err: CodecError) -> Self {
        let code = match &err {
            CodecError::UnknownColumn { .. } => MutationErrorCode::UnknownColumn,
            CodecError::TypeMismatch { .. } => MutationErrorCode::TypeMismatch,
            CodecError::MissingPrimaryKey { .. } => MutationErrorCode::MissingPrimaryKey,
            CodecError::KeyConflict { .. } => MutationErrorCode::KeyConflict,
            _ => MutationErrorCode::InvalidValue,
        };
        Self {
            code,
            message: err.to_string(),
            cause: MutationCause::Codec(err),
        }
    }
}

impl From<PlannerError> for MutationError {
    fn from(err: PlannerError) -> Self {
        Self {
            code: MutationErrorCode::QueryRejected,
            message: err.message().to_string(),
            cause: MutationCause::Planner(err),
        }
    }
}

impl From<ExecutorError> for MutationError {
    fn from(err: ExecutorError) -> Self {
        Self {
            code: MutationErrorCode::ExecutionFailed,
            message: err.message().to_string(),
            cause: MutationCause::Executor(err),
        }
    }
}

impl From<StoreError> for MutationError {
    fn from(err: StoreError) -> Self {
        Self {
            code: MutationErrorCode::StoreFailure,
            message: err.to_string(),
            cause: MutationCause::Store(err),
        }
    }
}

/// Result type for mutation operations
pub type MutationResult<T> = Result<T, MutationError>;
