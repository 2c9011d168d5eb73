//! Logical plan
//!
//! A structural translation of a select descriptor: joins nest left-deep in
//! declared order, and the where filter wraps the fully joined tree. No
//! pushdown, no reordering.

use std::sync::Arc;

use crate::filter::Filter;
use crate::query::{JoinType, Select};
use crate::schema::Table;

use super::errors::PlannerResult;
use super::validate::validate;

/// Logical operator tree
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalOperator {
    /// Base relation
    Select { table: Arc<Table> },
    /// Binary join
    Join {
        join_type: JoinType,
        on: Filter,
        left: Box<LogicalOperator>,
        right: Box<LogicalOperator>,
    },
    /// Predicate over its input
    Filter {
        input: Box<LogicalOperator>,
        filter: Filter,
    },
}

/// Builds the logical plan for a query, validating it first
pub fn plan_logical(query: &Select) -> PlannerResult<LogicalOperator> {
    validate(query)?;

    let mut plan = LogicalOperator::Select {
        table: Arc::clone(query.table()),
    };

    for join in query.joins() {
        plan = LogicalOperator::Join {
            join_type: join.join_type,
            on: join.on.clone(),
            left: Box::new(plan),
            right: Box::new(LogicalOperator::Select {
                table: Arc::clone(&join.table),
            }),
        };
    }

    if let Some(filter) = query.filter_expr() {
        plan = LogicalOperator::Filter {
            input: Box::new(plan),
            filter: filter.clone(),
        };
    }

    Ok(plan)
}
