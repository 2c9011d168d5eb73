//! Mutation builders
//!
//! `insert`, `update` and `delete_from` write through a single write
//! transaction. Update and delete find their rows with the query pipeline
//! before writing, inside the same transaction.
//!
//! ```ignore
//! use relkv::mutation::{delete_from, insert, update};
//!
//! insert(&users).value(row).execute(&mut tx)?;
//! update(&users).set([("name", "Johnny")]).filter(eq(id, "1")).execute(&mut tx)?;
//! delete_from(&users).filter(eq(id, "2")).execute(&mut tx)?;
//! tx.commit();
//! ```

mod delete;
mod errors;
mod insert;
mod locate;
mod update;

pub use delete::{delete_from, Delete};
pub use errors::{MutationCause, MutationError, MutationErrorCode, MutationResult};
pub use insert::{insert, Insert};
pub use update::{update, Update};
