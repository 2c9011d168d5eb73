//! Insert builder

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::schema::Table;
use crate::storage::{encode_record, record_key, CodecError, Record, WriteTransaction};

use super::errors::MutationResult;

/// Starts an insert into `table`
pub fn insert(table: &Arc<Table>) -> Insert {
    Insert {
        table: Arc::clone(table),
        rows: Vec::new(),
    }
}

/// Rows to write into one table
#[derive(Debug, Clone)]
pub struct Insert {
    table: Arc<Table>,
    rows: Vec<Record>,
}

impl Insert {
    /// Adds rows to insert
    pub fn values(&self, rows: impl IntoIterator<Item = Record>) -> Self {
        let mut next = self.clone();
        next.rows.extend(rows);
        next
    }

    /// Adds one row to insert
    pub fn value(&self, row: Record) -> Self {
        self.values([row])
    }

    /// Writes every row under its primary key, overwriting any existing
    /// record with the same key. Returns the number of rows written.
    ///
    /// All rows are checked before the first write.
    pub fn execute<T>(&self, tx: &mut T) -> MutationResult<usize>
    where
        T: WriteTransaction + ?Sized,
    {
        let scope = ObservationScope::with_fields("INSERT", &[("table", self.table.name())]);

        match self.write(tx) {
            Ok(written) => {
                let count = written.to_string();
                log_event_with_fields(
                    Event::RowsInserted,
                    &[("table", self.table.name()), ("rows", &count)],
                );
                scope.complete_with_fields(&[("rows", &count)]);
                Ok(written)
            }
            Err(e) => {
                scope.fail(e.code().code(), e.message());
                Err(e)
            }
        }
    }

    fn write<T>(&self, tx: &mut T) -> MutationResult<usize>
    where
        T: WriteTransaction + ?Sized,
    {
        let mut prepared = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let row = self.with_defaults(row)?;
            let key = record_key(&self.table, &row)?;
            prepared.push((key, encode_record(&self.table, &row)?));
        }

        let written = prepared.len();
        for (key, encoded) in prepared {
            tx.set(&key, JsonValue::Object(encoded))?;
        }
        Ok(written)
    }

    /// Fills absent columns from their defaults; function defaults run once per row
    fn with_defaults(&self, row: &Record) -> MutationResult<Record> {
        if let Some(name) = row.keys().find(|k| self.table.find_column(k).is_none()) {
            return Err(CodecError::UnknownColumn {
                table: self.table.name().to_string(),
                column: name.clone(),
            }
            .into());
        }

        let mut filled = row.clone();
        for column in self.table.columns() {
            if let Some(default) = column.default() {
                if !filled.contains_key(column.name()) {
                    filled.insert(column.name().to_string(), default.produce());
                }
            }
        }
        Ok(filled)
    }
}
