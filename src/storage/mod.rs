//! Storage contract for relkv
//!
//! relkv has no storage engine of its own. It runs against any ordered
//! key-value transaction that offers prefix scan, point get, and (for
//! writes) set and delete.
//!
//! # Record Layout
//!
//! - Key: `<table namespace>/<pk value>/...` in primary key order
//! - Value: JSON object of column name to primitive; dates as RFC 3339 strings
//!
//! `MemoryStore` is an in-process implementation of the contract.

mod errors;
mod key;
mod memory;
mod record;
mod traits;

pub use errors::{CodecError, CodecResult, StoreError, StoreResult};
pub use key::{key_component, record_key, table_prefix};
pub use memory::{MemoryReadTransaction, MemoryStore, MemoryWriteTransaction};
pub use record::{
    decode_date, decode_record, decode_value, encode_date, encode_record, encode_value, Record,
};
pub use traits::{ReadTransaction, WriteTransaction};
