//! Crate-level error
//!
//! Each subsystem has its own coded error; `Error` wraps whichever one a
//! convenience API (`Select::execute`, `Catalog` loading) can raise.

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::mutation::MutationError;
use crate::planner::PlannerError;
use crate::schema::SchemaError;
use crate::storage::StoreError;

/// Any error raised by relkv
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// Returns the `RELKV_…` code of the wrapped error
    pub fn code(&self) -> &'static str {
        match self {
            Error::Schema(e) => e.code().code(),
            Error::Planner(e) => e.code().code(),
            Error::Executor(e) => e.code().code(),
            Error::Mutation(e) => e.code().code(),
            Error::Store(_) => "RELKV_STORE_FAILURE",
        }
    }

    /// Returns the transaction error behind this error, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Error::Store(e) => Some(e),
            Error::Executor(e) => e.store_error(),
            Error::Mutation(e) => e.store_error(),
            _ => None,
        }
    }
}

/// Result type for crate-level operations
pub type Result<T> = std::result::Result<T, Error>;
