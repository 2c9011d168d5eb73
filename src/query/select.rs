//! Immutable select descriptor
//!
//! Every builder call returns a new `Select`; the receiver is left as it
//! was, so a partially built query can be shared and extended freely.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::executor::{QueryExecutor, Row};
use crate::filter::Filter;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::planner::{self, ExplainPlan, PlannerResult};
use crate::schema::Table;
use crate::storage::ReadTransaction;

/// Join kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    /// Unmatched left rows are dropped
    Inner,
    /// Unmatched left rows are kept without a right entry
    Left,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One join clause in declared order
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: Arc<Table>,
    pub on: Filter,
}

/// Declarative select over a base table, joins and an optional filter
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    table: Arc<Table>,
    joins: Vec<JoinClause>,
    filter: Option<Filter>,
}

impl Select {
    /// Starts a query over `table`
    pub fn from(table: &Arc<Table>) -> Self {
        Self {
            table: Arc::clone(table),
            joins: Vec::new(),
            filter: None,
        }
    }

    fn with_join(&self, join_type: JoinType, table: &Arc<Table>, on: Filter) -> Self {
        let mut next = self.clone();
        next.joins.push(JoinClause {
            join_type,
            table: Arc::clone(table),
            on,
        });
        next
    }

    /// Appends an inner join
    pub fn inner_join(&self, table: &Arc<Table>, on: Filter) -> Self {
        self.with_join(JoinType::Inner, table, on)
    }

    /// Appends a left join
    pub fn left_join(&self, table: &Arc<Table>, on: Filter) -> Self {
        self.with_join(JoinType::Left, table, on)
    }

    /// Sets the where filter, replacing any previous one
    pub fn filter(&self, filter: Filter) -> Self {
        let mut next = self.clone();
        next.filter = Some(filter);
        next
    }

    /// Base table
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Join clauses in declared order
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn filter_expr(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Base table followed by every joined table
    pub fn tables(&self) -> Vec<&Arc<Table>> {
        std::iter::once(&self.table)
            .chain(self.joins.iter().map(|j| &j.table))
            .collect()
    }

    /// Checks that every filter references only tables of this query
    pub fn validate(&self) -> PlannerResult<()> {
        planner::validate(self)
    }

    /// Describes the physical plan without touching storage
    pub fn explain(&self) -> ExplainPlan {
        match planner::plan_logical(self) {
            Ok(logical) => ExplainPlan::from_physical(&planner::plan_physical(&logical)),
            Err(e) => ExplainPlan::from_error(&e),
        }
    }

    /// Plans and runs the query with the default executor
    pub fn execute<T>(&self, tx: &T) -> Result<Vec<Row>>
    where
        T: ReadTransaction + ?Sized,
    {
        self.execute_with(&QueryExecutor::default(), tx)
    }

    /// Plans and runs the query with a configured executor
    pub fn execute_with<T>(&self, executor: &QueryExecutor, tx: &T) -> Result<Vec<Row>>
    where
        T: ReadTransaction + ?Sized,
    {
        let scope = ObservationScope::with_fields("SELECT", &[("table", self.table.name())]);

        let result = self.run(executor, tx);
        match &result {
            Ok(rows) => scope.complete_with_fields(&[("rows", &rows.len().to_string())]),
            Err(e) => scope.fail(e.code(), &e.to_string()),
        }
        result
    }

    fn run<T>(&self, executor: &QueryExecutor, tx: &T) -> Result<Vec<Row>>
    where
        T: ReadTransaction + ?Sized,
    {
        let logical = planner::plan_logical(self)?;
        let physical = planner::plan_physical(&logical);
        log_event_with_fields(
            Event::PlanBuilt,
            &[("table", self.table.name()), ("root", physical.kind())],
        );
        Ok(executor.execute(&physical, tx)?)
    }
}
