//! Schema model for relkv
//!
//! Tables and typed columns defined once at startup and shared by
//! reference for the life of the process.
//!
//! # Design Principles
//!
//! - Every table has at least one primary key column
//! - Tables are immutable after construction
//! - Identity is per instance: an alias is a separate table over the same records
//! - Column defaults are evaluated at insert time, never at definition time

mod catalog;
mod errors;
mod table;
mod types;

pub use catalog::{Catalog, ColumnDef, TableDef};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use table::{Column, DefaultFn, DefaultValue, Table, TableIdent, KEY_SEPARATOR};
pub use types::{ColumnType, IncomparableTypes, Value};
