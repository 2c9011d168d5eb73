//! Query validation
//!
//! Every column referenced by the where filter or a join condition must
//! belong to the base table or a joined table. Checked before planning and
//! before the store is touched.

use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};
use crate::query::Select;

use super::errors::{PlannerError, PlannerResult};

/// Validates a select descriptor.
///
/// The where filter is checked first, then each join condition in declared
/// order; the first offending table is reported.
pub fn validate(query: &Select) -> PlannerResult<()> {
    let result = check_references(query);

    match &result {
        Ok(()) => log_event_with_fields(
            Event::QueryValidated,
            &[
                ("table", query.table().name()),
                ("joins", &query.joins().len().to_string()),
            ],
        ),
        Err(e) => log_event_with_fields(
            Event::QueryRejected,
            &[
                ("table", query.table().name()),
                ("code", e.code().code()),
                ("reason", e.message()),
            ],
        ),
    }

    result
}

fn check_references(query: &Select) -> PlannerResult<()> {
    let in_query: Vec<Uuid> = query.tables().iter().map(|t| t.id()).collect();

    let filters = query
        .filter_expr()
        .into_iter()
        .chain(query.joins().iter().map(|j| &j.on));

    for filter in filters {
        for column in filter.columns() {
            match &column.table {
                None => return Err(PlannerError::unattached_column(&column.column)),
                Some(t) if !in_query.contains(&t.id) => {
                    return Err(PlannerError::table_not_in_query(&t.name))
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}
