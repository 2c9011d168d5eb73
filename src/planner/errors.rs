//! Planner error types
//!
//! Error codes:
//! - RELKV_QUERY_TABLE_NOT_IN_QUERY (REJECT)
//! - RELKV_QUERY_UNATTACHED_COLUMN (REJECT)
//!
//! Both are raised before the store is touched.

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query rejected, never retried
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// A filter references a table that is neither the base nor a joined table
    TableNotInQuery,
    /// A filter references a column that belongs to no table
    UnattachedColumn,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::TableNotInQuery => "RELKV_QUERY_TABLE_NOT_IN_QUERY",
            PlannerErrorCode::UnattachedColumn => "RELKV_QUERY_UNATTACHED_COLUMN",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Offending table name or alias, if known
    table: Option<String>,
}

impl PlannerError {
    /// Create a table not in query error
    pub fn table_not_in_query(table: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: PlannerErrorCode::TableNotInQuery,
            message: format!(
                "Table '{}' is referenced by a filter but is not part of the query",
                t
            ),
            table: Some(t),
        }
    }

    /// Create an unattached column error
    pub fn unattached_column(column: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::UnattachedColumn,
            message: format!(
                "Column '{}' is not attached to any table",
                column.into()
            ),
            table: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
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

    /// Returns the offending table if applicable
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl fmt::Display for PlannerError {
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

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
