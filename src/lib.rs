//! relkv - a typed relational query layer over an ordered key-value transaction
//!
//! Tables with typed columns, a filter language, and select queries with
//! inner and left joins, planned and executed against any transaction that
//! offers prefix scan and point get. relkv has no storage engine of its own.
//!
//! # Pipeline
//!
//! ```text
//! Select ──validate──▶ LogicalOperator ──▶ PhysicalOperator ──execute──▶ Vec<Row>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use relkv::{filter::eq, query::Select, schema::{Column, Table}, storage::MemoryStore};
//!
//! let users = Table::new("users", [Column::string("id").primary_key(), Column::string("name")])?;
//! let store = MemoryStore::new();
//! let tx = store.begin_read()?;
//! let rows = Select::from(&users)
//!     .filter(eq(users.column("name")?, "John Doe"))
//!     .execute(&tx)?;
//! ```

pub mod error;
pub mod executor;
pub mod filter;
pub mod mutation;
pub mod observability;
pub mod planner;
pub mod query;
pub mod schema;
pub mod storage;

pub use error::{Error, Result};
