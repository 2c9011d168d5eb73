//! Predicate evaluation
//!
//! Column operands resolve against the row by table name and column name;
//! a missing table entry or column resolves to null.
//!
//! Null handling:
//! - `eq` is true only if both sides are null
//! - `neq` is true unless both sides are null
//! - ordering comparisons involving null are false

use std::cmp::Ordering;

use crate::filter::{CompareOp, Filter, Operand};
use crate::schema::Value;

use super::errors::{ExecutorError, ExecutorResult};
use super::row::Row;

static NULL: Value = Value::Null;

/// Evaluates a filter against one row
pub fn evaluate(row: &Row, filter: &Filter) -> ExecutorResult<bool> {
    match filter {
        Filter::Compare { op, left, right } => {
            compare(*op, resolve(row, left), resolve(row, right))
        }
        Filter::And(filters) => {
            for f in filters {
                if !evaluate(row, f)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Filter::Or(filters) => {
            for f in filters {
                if evaluate(row, f)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn resolve<'a>(row: &'a Row, operand: &'a Operand) -> &'a Value {
    match operand {
        Operand::Literal(v) => v,
        Operand::Column(c) => c
            .table
            .as_ref()
            .and_then(|t| row.value(&t.name, &c.column))
            .unwrap_or(&NULL),
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> ExecutorResult<bool> {
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return Ok(match op {
            CompareOp::Eq => both,
            CompareOp::Neq => !both,
            _ => false,
        });
    }

    let ordering = left
        .compare(right)
        .map_err(|e| ExecutorError::type_mismatch(op, e))?;

    // Unordered (NaN) is only ever "not equal"
    let Some(ordering) = ordering else {
        return Ok(op == CompareOp::Neq);
    };

    Ok(match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Neq => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Lte => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Gte => ordering != Ordering::Less,
    })
}
