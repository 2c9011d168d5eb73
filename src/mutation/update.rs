//! Update builder

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::executor::QueryExecutor;
use crate::filter::Filter;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::schema::{Table, Value};
use crate::storage::{encode_record, encode_value, record_key, CodecError, Record, WriteTransaction};

use super::errors::MutationResult;
use super::locate::locate;

/// Starts an update of `table`
pub fn update(table: &Arc<Table>) -> Update {
    Update {
        table: Arc::clone(table),
        values: Record::new(),
        filter: None,
    }
}

/// New column values for the rows of one table matching a filter
#[derive(Debug, Clone)]
pub struct Update {
    table: Arc<Table>,
    values: Record,
    filter: Option<Filter>,
}

impl Update {
    /// Adds column values to write; later values for a column replace earlier ones
    pub fn set<K, V>(&self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut next = self.clone();
        next.values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        next
    }

    /// Restricts the update to matching rows; without a filter every row is updated
    pub fn filter(&self, filter: Filter) -> Self {
        let mut next = self.clone();
        next.filter = Some(filter);
        next
    }

    /// Runs the update with the default executor
    pub fn execute<T>(&self, tx: &mut T) -> MutationResult<usize>
    where
        T: WriteTransaction + ?Sized,
    {
        self.execute_with(&QueryExecutor::default(), tx)
    }

    /// Merges the new values over every matching record and rewrites it.
    ///
    /// A record whose primary key changes is removed from its old key. The
    /// update is rejected before any write if two records would land on the
    /// same key, or a record would land on a key held by an untouched record.
    /// Returns the number of rows updated.
    pub fn execute_with<T>(&self, executor: &QueryExecutor, tx: &mut T) -> MutationResult<usize>
    where
        T: WriteTransaction + ?Sized,
    {
        let scope = ObservationScope::with_fields("UPDATE", &[("table", self.table.name())]);

        match self.write(executor, tx) {
            Ok(updated) => {
                let count = updated.to_string();
                log_event_with_fields(
                    Event::RowsUpdated,
                    &[("table", self.table.name()), ("rows", &count)],
                );
                scope.complete_with_fields(&[("rows", &count)]);
                Ok(updated)
            }
            Err(e) => {
                scope.fail(e.code().code(), e.message());
                Err(e)
            }
        }
    }

    fn write<T>(&self, executor: &QueryExecutor, tx: &mut T) -> MutationResult<usize>
    where
        T: WriteTransaction + ?Sized,
    {
        for (name, value) in &self.values {
            let column = self
                .table
                .find_column(name)
                .ok_or_else(|| CodecError::UnknownColumn {
                    table: self.table.name().to_string(),
                    column: name.clone(),
                })?;
            encode_value(column, value)?;
        }

        let existing = locate(executor, &self.table, self.filter.as_ref(), &*tx)?;

        let mut planned = Vec::with_capacity(existing.len());
        for record in &existing {
            let old_key = record_key(&self.table, record)?;

            let mut merged = record.clone();
            merged.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
            let new_key = record_key(&self.table, &merged)?;
            let encoded = encode_record(&self.table, &merged)?;
            planned.push((old_key, new_key, encoded));
        }

        // Every target key must be unique and either freed by this update or unused
        let old_keys: BTreeSet<&str> = planned.iter().map(|(old, _, _)| old.as_str()).collect();
        let mut new_keys = BTreeSet::new();
        for (old_key, new_key, _) in &planned {
            let taken = !new_keys.insert(new_key.as_str())
                || (new_key != old_key
                    && !old_keys.contains(new_key.as_str())
                    && tx.get(new_key)?.is_some());
            if taken {
                return Err(CodecError::KeyConflict {
                    table: self.table.name().to_string(),
                    key: new_key.clone(),
                }
                .into());
            }
        }

        for (old_key, new_key, _) in &planned {
            if new_key != old_key {
                tx.delete(old_key)?;
            }
        }
        let updated = planned.len();
        for (_, new_key, encoded) in planned {
            tx.set(&new_key, JsonValue::Object(encoded))?;
        }

        Ok(updated)
    }
}
