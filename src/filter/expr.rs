//! Filter expression tree
//!
//! Filters are plain data; construction never fails and never touches the
//! store. The executor interprets them.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::schema::{Column, ColumnType, TableIdent, Value};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Returns the operator name
    pub fn op_name(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
        }
    }

    /// Returns the infix symbol used in explain output
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }

    /// Returns true for lt/lte/gt/gte
    pub fn is_ordering(&self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Neq)
    }
}

/// Reference to a column of a specific table instance
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// Owning table; None for a column that was never attached
    pub table: Option<TableIdent>,
    pub column: String,
    pub column_type: ColumnType,
}

impl From<&Column> for ColumnRef {
    fn from(column: &Column) -> Self {
        Self {
            table: column.table().cloned(),
            column: column.name().to_string(),
            column_type: column.column_type(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(t) => write!(f, "{}.{}", t.name, self.column),
            None => write!(f, "?.{}", self.column),
        }
    }
}

/// One side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Column(ColumnRef),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(v) => write!(f, "{}", v),
            Operand::Column(c) => write!(f, "{}", c),
        }
    }
}

impl From<&Column> for Operand {
    fn from(column: &Column) -> Self {
        Operand::Column(column.into())
    }
}

impl From<ColumnRef> for Operand {
    fn from(column: ColumnRef) -> Self {
        Operand::Column(column)
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Literal(v)
    }
}

macro_rules! literal_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Literal(Value::from(v))
                }
            }
        )*
    };
}

literal_operand!(&str, String, f64, i64, i32, bool, DateTime<Utc>);

/// Filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Binary comparison
    Compare {
        op: CompareOp,
        left: Operand,
        right: Operand,
    },
    /// True iff every sub-filter is true; empty is true
    And(Vec<Filter>),
    /// True iff any sub-filter is true; empty is false
    Or(Vec<Filter>),
}

fn compare(op: CompareOp, left: impl Into<Operand>, right: impl Into<Operand>) -> Filter {
    Filter::Compare {
        op,
        left: left.into(),
        right: right.into(),
    }
}

/// left = right
pub fn eq(left: impl Into<Operand>, right: impl Into<Operand>) -> Filter {
    compare(CompareOp::Eq, left, right)
}

/// left != right
pub fn neq(left: impl Into<Operand>, right: impl Into<Operand>) -> Filter {
    compare(CompareOp::Neq, left, right)
}

/// left < right
pub fn lt(left: impl Into<Operand>, right: impl Into<Operand>) -> Filter {
    compare(CompareOp::Lt, left, right)
}

/// left <= right
pub fn lte(left: impl Into<Operand>, right: impl Into<Operand>) -> Filter {
    compare(CompareOp::Lte, left, right)
}

/// left > right
pub fn gt(left: impl Into<Operand>, right: impl Into<Operand>) -> Filter {
    compare(CompareOp::Gt, left, right)
}

/// left >= right
pub fn gte(left: impl Into<Operand>, right: impl Into<Operand>) -> Filter {
    compare(CompareOp::Gte, left, right)
}

/// Conjunction of filters
pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
    Filter::And(filters.into_iter().collect())
}

/// Disjunction of filters
pub fn or(filters: impl IntoIterator<Item = Filter>) -> Filter {
    Filter::Or(filters.into_iter().collect())
}

impl Filter {
    /// Visits every column operand in tree order
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Filter::Compare { left, right, .. } => {
                for operand in [left, right] {
                    if let Operand::Column(c) = operand {
                        out.push(c);
                    }
                }
            }
            Filter::And(filters) | Filter::Or(filters) => {
                for f in filters {
                    f.collect_columns(out);
                }
            }
        }
    }

    /// Distinct tables referenced by column operands, in first-appearance order
    pub fn tables(&self) -> Vec<&TableIdent> {
        let mut out: Vec<&TableIdent> = Vec::new();
        for column in self.columns() {
            if let Some(table) = &column.table {
                if !out.iter().any(|t| t.id == table.id) {
                    out.push(table);
                }
            }
        }
        out
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Compare { op, left, right } => {
                write!(f, "{} {} {}", left, op.symbol(), right)
            }
            Filter::And(filters) | Filter::Or(filters) => {
                if filters.is_empty() {
                    let empty = if matches!(self, Filter::And(_)) { "true" } else { "false" };
                    return write!(f, "{}", empty);
                }
                let joiner = if matches!(self, Filter::And(_)) { " AND " } else { " OR " };
                write!(f, "(")?;
                for (i, sub) in filters.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", joiner)?;
                    }
                    write!(f, "{}", sub)?;
                }
                write!(f, ")")
            }
        }
    }
}
