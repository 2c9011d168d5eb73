//! Delete builder

use std::sync::Arc;

use crate::executor::QueryExecutor;
use crate::filter::Filter;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::schema::Table;
use crate::storage::{record_key, WriteTransaction};

use super::errors::MutationResult;
use super::locate::locate;

/// Starts a delete from `table`
pub fn delete_from(table: &Arc<Table>) -> Delete {
    Delete {
        table: Arc::clone(table),
        filter: None,
    }
}

/// Removal of the rows of one table matching a filter
#[derive(Debug, Clone)]
pub struct Delete {
    table: Arc<Table>,
    filter: Option<Filter>,
}

impl Delete {
    /// Restricts the delete to matching rows; without a filter every row is deleted
    pub fn filter(&self, filter: Filter) -> Self {
        Self {
            table: Arc::clone(&self.table),
            filter: Some(filter),
        }
    }

    /// Runs the delete with the default executor
    pub fn execute<T>(&self, tx: &mut T) -> MutationResult<usize>
    where
        T: WriteTransaction + ?Sized,
    {
        self.execute_with(&QueryExecutor::default(), tx)
    }

    /// Deletes every matching row. Returns the number of rows deleted.
    pub fn execute_with<T>(&self, executor: &QueryExecutor, tx: &mut T) -> MutationResult<usize>
    where
        T: WriteTransaction + ?Sized,
    {
        let scope = ObservationScope::with_fields("DELETE", &[("table", self.table.name())]);

        match self.write(executor, tx) {
            Ok(deleted) => {
                let count = deleted.to_string();
                log_event_with_fields(
                    Event::RowsDeleted,
                    &[("table", self.table.name()), ("rows", &count)],
                );
                scope.complete_with_fields(&[("rows", &count)]);
                Ok(deleted)
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
        let existing = locate(executor, &self.table, self.filter.as_ref(), &*tx)?;

        let mut deleted = 0;
        for record in &existing {
            if tx.delete(&record_key(&self.table, record)?)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
