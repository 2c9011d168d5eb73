//! Observable events for relkv
//!
//! Events are explicit and typed. Each maps to a fixed string used as the
//! `event` field of a log line.

use std::fmt;

use super::logger::Severity;

/// Observable events in the query pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Planning
    /// Query descriptor passed validation
    QueryValidated,
    /// Query descriptor failed validation
    QueryRejected,
    /// Logical and physical plans built
    PlanBuilt,

    // Execution
    /// One physical operator produced its rows
    OperatorEvaluated,
    /// Whole plan evaluated
    QueryExecuted,

    // Mutation
    /// Rows written by an insert
    RowsInserted,
    /// Rows rewritten by an update
    RowsUpdated,
    /// Rows removed by a delete
    RowsDeleted,

    // Configuration
    /// Executor configuration applied
    ConfigApplied,
}

impl Event {
    /// Returns the event name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::QueryValidated => "QUERY_VALIDATED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::PlanBuilt => "PLAN_BUILT",
            Event::OperatorEvaluated => "OPERATOR_EVALUATED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::RowsInserted => "ROWS_INSERTED",
            Event::RowsUpdated => "ROWS_UPDATED",
            Event::RowsDeleted => "ROWS_DELETED",
            Event::ConfigApplied => "CONFIG_APPLIED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::OperatorEvaluated | Event::PlanBuilt | Event::QueryValidated => Severity::Trace,
            Event::QueryRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
