//! Query executor for relkv
//!
//! Evaluates physical plans against a read transaction and produces rows.
//!
//! # Design Principles
//!
//! - Stateless between calls; each call gets its own transaction
//! - Store errors propagate unchanged, never partial results
//! - A record that does not decode is corruption, not a skipped row
//! - Join collisions are raised, never resolved by overwriting

mod config;
mod errors;
mod executor;
mod predicate;
mod row;

pub use config::ExecutorConfig;
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::{execute, QueryExecutor};
pub use predicate::evaluate;
pub use row::Row;
