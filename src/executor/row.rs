//! Result rows
//!
//! A row maps each table name or alias in scope to one decoded record.
//! A scan yields single-entry rows; a join yields the union of its inputs.

use std::collections::BTreeMap;

use crate::schema::Value;
use crate::storage::Record;

use super::errors::{ExecutorError, ExecutorResult};

/// One result row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: BTreeMap<String, Record>,
}

impl Row {
    /// Row holding a single table's record
    pub fn single(table: impl Into<String>, record: Record) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(table.into(), record);
        Self { entries }
    }

    /// Record for a table name or alias
    pub fn get(&self, table: &str) -> Option<&Record> {
        self.entries.get(table)
    }

    /// Value of one column; None if the table or column is absent
    pub fn value(&self, table: &str, column: &str) -> Option<&Value> {
        self.entries.get(table).and_then(|r| r.get(column))
    }

    /// Table names present in this row, sorted
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns one table's record
    pub fn take(&mut self, table: &str) -> Option<Record> {
        self.entries.remove(table)
    }

    /// Union of two rows. A table present on both sides is an error.
    pub fn merge(&self, other: &Row) -> ExecutorResult<Row> {
        let mut merged = self.clone();
        for (table, record) in &other.entries {
            if merged.entries.contains_key(table) {
                return Err(ExecutorError::row_collision(table));
            }
            merged.entries.insert(table.clone(), record.clone());
        }
        Ok(merged)
    }
}
