//! Physical plan
//!
//! One physical tree per logical tree. There is no cost model and no index
//! path: `Search` is part of the operator vocabulary but the planner never
//! produces it, and the executor rejects it.

use std::sync::Arc;

use crate::filter::Filter;
use crate::query::JoinType;
use crate::schema::{Table, Value};

use super::logical::LogicalOperator;

/// Executable operator tree
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicalOperator {
    /// Full prefix read of a table
    Scan { table: Arc<Table> },
    /// Index-backed lookup of `column = value`
    Search {
        table: Arc<Table>,
        column: String,
        value: Value,
    },
    /// Keeps rows matching the filter
    Filter {
        input: Box<PhysicalOperator>,
        filter: Filter,
    },
    /// Compares every left row with every right row
    NestedLoopJoin {
        left: Box<PhysicalOperator>,
        right: Box<PhysicalOperator>,
        join_type: JoinType,
        on: Filter,
    },
}

impl PhysicalOperator {
    /// Operator name used in logs and explain output
    pub fn kind(&self) -> &'static str {
        match self {
            PhysicalOperator::Scan { .. } => "SCAN",
            PhysicalOperator::Search { .. } => "SEARCH",
            PhysicalOperator::Filter { .. } => "FILTER",
            PhysicalOperator::NestedLoopJoin { .. } => "NESTED_LOOP_JOIN",
        }
    }
}

/// Maps a logical plan onto physical operators
pub fn plan_physical(logical: &LogicalOperator) -> PhysicalOperator {
    match logical {
        LogicalOperator::Select { table } => PhysicalOperator::Scan {
            table: Arc::clone(table),
        },
        LogicalOperator::Join {
            join_type,
            on,
            left,
            right,
        } => PhysicalOperator::NestedLoopJoin {
            left: Box::new(plan_physical(left)),
            right: Box::new(plan_physical(right)),
            join_type: *join_type,
            on: on.clone(),
        },
        LogicalOperator::Filter { input, filter } => PhysicalOperator::Filter {
            input: Box::new(plan_physical(input)),
            filter: filter.clone(),
        },
    }
}
