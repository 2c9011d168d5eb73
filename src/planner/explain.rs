//! Explain output
//!
//! Deterministic, human-readable rendering of a physical plan, or of the
//! error that rejected a query.

use std::fmt;

use super::errors::PlannerError;
use super::physical::PhysicalOperator;

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    /// One line per operator, children indented under their parent
    pub operators: Vec<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a physical plan
    pub fn from_physical(plan: &PhysicalOperator) -> Self {
        let mut operators = Vec::new();
        describe(plan, 0, &mut operators);
        Self {
            accepted: true,
            operators,
            rejection_code: None,
            rejection_reason: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &PlannerError) -> Self {
        Self {
            accepted: false,
            operators: Vec::new(),
            rejection_code: Some(err.code().code().to_string()),
            rejection_reason: Some(err.message().to_string()),
        }
    }
}

fn describe(plan: &PhysicalOperator, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match plan {
        PhysicalOperator::Scan { table } => {
            if table.name() == table.namespace() {
                out.push(format!("{}SCAN {}", indent, table.name()));
            } else {
                out.push(format!("{}SCAN {} AS {}", indent, table.namespace(), table.name()));
            }
        }
        PhysicalOperator::Search {
            table,
            column,
            value,
        } => {
            out.push(format!("{}SEARCH {}.{} = {}", indent, table.name(), column, value));
        }
        PhysicalOperator::Filter { input, filter } => {
            out.push(format!("{}FILTER {}", indent, filter));
            describe(input, depth + 1, out);
        }
        PhysicalOperator::NestedLoopJoin {
            left,
            right,
            join_type,
            on,
        } => {
            out.push(format!("{}NESTED LOOP JOIN {} ON {}", indent, join_type, on));
            describe(left, depth + 1, out);
            describe(right, depth + 1, out);
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            for line in &self.operators {
                writeln!(f, "{}", line)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
