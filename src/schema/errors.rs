//! Schema error types
//!
//! Error codes:
//! - RELKV_SCHEMA_NO_PRIMARY_KEY (REJECT)
//! - RELKV_SCHEMA_DUPLICATE_COLUMN (REJECT)
//! - RELKV_SCHEMA_INVALID_NAME (REJECT)
//! - RELKV_SCHEMA_DEFAULT_TYPE_MISMATCH (REJECT)
//! - RELKV_SCHEMA_UNKNOWN_COLUMN (REJECT)
//! - RELKV_SCHEMA_DUPLICATE_TABLE (REJECT)
//! - RELKV_SCHEMA_MALFORMED_DEFINITION (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Definition rejected, nothing was registered
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Table declares no primary key column
    NoPrimaryKey,
    /// Two columns share a name
    DuplicateColumn,
    /// Empty name, or name containing the key separator
    InvalidName,
    /// Literal default does not match the column type
    DefaultTypeMismatch,
    /// Column lookup by name failed
    UnknownColumn,
    /// Catalog already holds a table with this name
    DuplicateTable,
    /// Table definition document could not be parsed
    MalformedDefinition,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::NoPrimaryKey => "RELKV_SCHEMA_NO_PRIMARY_KEY",
            SchemaErrorCode::DuplicateColumn => "RELKV_SCHEMA_DUPLICATE_COLUMN",
            SchemaErrorCode::InvalidName => "RELKV_SCHEMA_INVALID_NAME",
            SchemaErrorCode::DefaultTypeMismatch => "RELKV_SCHEMA_DEFAULT_TYPE_MISMATCH",
            SchemaErrorCode::UnknownColumn => "RELKV_SCHEMA_UNKNOWN_COLUMN",
            SchemaErrorCode::DuplicateTable => "RELKV_SCHEMA_DUPLICATE_TABLE",
            SchemaErrorCode::MalformedDefinition => "RELKV_SCHEMA_MALFORMED_DEFINITION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Table name if applicable
    table: Option<String>,
    /// Column name if applicable
    column: Option<String>,
}

impl SchemaError {
    /// Create a missing primary key error
    pub fn no_primary_key(table: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: SchemaErrorCode::NoPrimaryKey,
            message: format!("Table '{}' must have at least one primary key column", t),
            table: Some(t),
            column: None,
        }
    }

    /// Create a duplicate column error
    pub fn duplicate_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        let t = table.into();
        let c = column.into();
        Self {
            code: SchemaErrorCode::DuplicateColumn,
            message: format!("Table '{}' declares column '{}' more than once", t, c),
            table: Some(t),
            column: Some(c),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: &str) -> Self {
        let n = name.into();
        Self {
            code: SchemaErrorCode::InvalidName,
            message: format!("Invalid name '{}': {}", n, reason),
            table: None,
            column: None,
        }
    }

    /// Create a default type mismatch error
    pub fn default_type_mismatch(
        column: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        let c = column.into();
        Self {
            code: SchemaErrorCode::DefaultTypeMismatch,
            message: format!(
                "Default for column '{}' must be {}, got {}",
                c, expected, actual
            ),
            table: None,
            column: Some(c),
        }
    }

    /// Create an unknown column error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        let t = table.into();
        let c = column.into();
        Self {
            code: SchemaErrorCode::UnknownColumn,
            message: format!("Table '{}' has no column '{}'", t, c),
            table: Some(t),
            column: Some(c),
        }
    }

    /// Create a duplicate table error
    pub fn duplicate_table(table: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: SchemaErrorCode::DuplicateTable,
            message: format!("Table '{}' is already registered", t),
            table: Some(t),
            column: None,
        }
    }

    /// Create a malformed definition error
    pub fn malformed_definition(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedDefinition,
            message: format!("Malformed table definition: {}", reason.into()),
            table: None,
            column: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
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

    /// Returns the table name if applicable
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Returns the column name if applicable
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
