//! Finds the records a mutation applies to, through the query pipeline

use std::sync::Arc;

use crate::executor::QueryExecutor;
use crate::filter::Filter;
use crate::planner::{plan_logical, plan_physical};
use crate::query::Select;
use crate::schema::Table;
use crate::storage::{Record, ReadTransaction};

use super::errors::MutationResult;

/// Records of `table` matching `filter` (every record if None), in key order
pub(crate) fn locate<T>(
    executor: &QueryExecutor,
    table: &Arc<Table>,
    filter: Option<&Filter>,
    tx: &T,
) -> MutationResult<Vec<Record>>
where
    T: ReadTransaction + ?Sized,
{
    let mut query = Select::from(table);
    if let Some(f) = filter {
        query = query.filter(f.clone());
    }

    let plan = plan_physical(&plan_logical(&query)?);
    let rows = executor.execute(&plan, tx)?;

    Ok(rows
        .into_iter()
        .filter_map(|mut row| row.take(table.name()))
        .collect())
}
