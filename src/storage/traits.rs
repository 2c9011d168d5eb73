//! Transaction capabilities required from the underlying store

use serde_json::Value as JsonValue;

use super::errors::StoreResult;

/// Read-only transaction over an ordered key space
pub trait ReadTransaction {
    /// Returns every entry whose key starts with `prefix`, in key order
    fn scan(&self, prefix: &str) -> StoreResult<Vec<(String, JsonValue)>>;

    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<JsonValue>>;
}

/// Read-write transaction
pub trait WriteTransaction: ReadTransaction {
    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: JsonValue) -> StoreResult<()>;

    /// Removes `key`; returns whether it was present
    fn delete(&mut self, key: &str) -> StoreResult<bool>;
}
