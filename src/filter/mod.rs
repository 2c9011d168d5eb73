//! Filter expression language
//!
//! Comparisons (`eq`, `neq`, `lt`, `lte`, `gt`, `gte`) over literals and
//! column references, combined with `and` / `or`.
//!
//! ```ignore
//! use relkv::filter::{and, eq, neq};
//!
//! let f = and([neq(users.column("id")?, "1"), eq(users.column("name")?, "John Doe")]);
//! ```

mod expr;

pub use expr::{and, eq, gt, gte, lt, lte, neq, or, ColumnRef, CompareOp, Filter, Operand};
