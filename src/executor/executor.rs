//! Physical plan evaluation
//!
//! - Scan reads the table's key prefix and decodes every record
//! - Filter keeps the input rows its predicate accepts
//! - Nested loop join materializes the left side, then the right side, and
//!   tests every pair; O(|left| × |right|) per join level
//! - Search has no evaluator
//!
//! Output order is deterministic: scans follow store key order and joins
//! follow left-then-right accumulation order.

use crate::filter::Filter;
use crate::observability::{log_event_with_fields, Event, Logger, Severity, Timer};
use crate::planner::PhysicalOperator;
use crate::query::JoinType;
use crate::schema::Table;
use crate::storage::{decode_record, table_prefix, ReadTransaction};

use super::config::ExecutorConfig;
use super::errors::{ExecutorError, ExecutorResult};
use super::predicate::evaluate;
use super::row::Row;

/// Evaluates physical plans against a read transaction.
///
/// Holds only configuration, so one executor can serve any number of
/// concurrent calls, each with its own transaction.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    config: ExecutorConfig,
}

impl QueryExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs a plan to completion. Any failing operator fails the whole call.
    pub fn execute<T>(&self, plan: &PhysicalOperator, tx: &T) -> ExecutorResult<Vec<Row>>
    where
        T: ReadTransaction + ?Sized,
    {
        let timer = Timer::new();
        let rows = self.evaluate(plan, tx)?;

        log_event_with_fields(
            Event::QueryExecuted,
            &[
                ("root", plan.kind()),
                ("rows", &rows.len().to_string()),
                ("elapsed_ms", &timer.elapsed_ms()),
            ],
        );
        Ok(rows)
    }

    fn evaluate<T>(&self, plan: &PhysicalOperator, tx: &T) -> ExecutorResult<Vec<Row>>
    where
        T: ReadTransaction + ?Sized,
    {
        let rows = match plan {
            PhysicalOperator::Scan { table } => self.scan(table, tx)?,
            PhysicalOperator::Search { .. } => {
                return Err(ExecutorError::not_implemented(plan.kind()))
            }
            PhysicalOperator::Filter { input, filter } => {
                let input = self.evaluate(input, tx)?;
                let mut out = Vec::new();
                for row in input {
                    if evaluate(&row, filter)? {
                        out.push(row);
                    }
                }
                out
            }
            PhysicalOperator::NestedLoopJoin {
                left,
                right,
                join_type,
                on,
            } => {
                // Left fully, then right fully
                let left_rows = self.evaluate(left, tx)?;
                let right_rows = self.evaluate(right, tx)?;
                self.nested_loop_join(&left_rows, &right_rows, *join_type, on)?
            }
        };

        self.check_limit(plan.kind(), rows.len())?;

        if Logger::enabled(Severity::Trace) {
            log_event_with_fields(
                Event::OperatorEvaluated,
                &[("operator", plan.kind()), ("rows", &rows.len().to_string())],
            );
        }
        Ok(rows)
    }

    fn scan<T>(&self, table: &Table, tx: &T) -> ExecutorResult<Vec<Row>>
    where
        T: ReadTransaction + ?Sized,
    {
        let entries = tx.scan(&table_prefix(table))?;

        entries
            .into_iter()
            .map(|(key, raw)| -> ExecutorResult<Row> {
                let record = decode_record(table, &key, &raw)
                    .map_err(|e| ExecutorError::data_corruption(&key, &e))?;
                Ok(Row::single(table.name(), record))
            })
            .collect()
    }

    fn nested_loop_join(
        &self,
        left: &[Row],
        right: &[Row],
        join_type: JoinType,
        on: &Filter,
    ) -> ExecutorResult<Vec<Row>> {
        let kind = "NESTED_LOOP_JOIN";
        let mut out = Vec::new();

        for l in left {
            let mut matched = false;
            for r in right {
                let merged = l.merge(r)?;
                if evaluate(&merged, on)? {
                    matched = true;
                    out.push(merged);
                    self.check_limit(kind, out.len())?;
                }
            }
            if !matched && join_type == JoinType::Left {
                out.push(l.clone());
                self.check_limit(kind, out.len())?;
            }
        }

        Ok(out)
    }

    fn check_limit(&self, operator: &str, produced: usize) -> ExecutorResult<()> {
        match self.config.max_rows {
            Some(limit) if produced > limit => Err(ExecutorError::limit_exceeded(operator, limit)),
            _ => Ok(()),
        }
    }
}

/// Runs a plan with the default executor configuration
pub fn execute<T>(plan: &PhysicalOperator, tx: &T) -> ExecutorResult<Vec<Row>>
where
    T: ReadTransaction + ?Sized,
{
    QueryExecutor::default().execute(plan, tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorErrorCode;
    use crate::filter::{and, eq, neq};
    use crate::planner::{plan_logical, plan_physical};
    use crate::query::Select;
    use crate::schema::{Column, Value};
    use crate::storage::{MemoryStore, StoreError, StoreResult, WriteTransaction};
    use serde_json::{json, Value as JsonValue};
    use std::sync::Arc;

    fn users() -> Arc<Table> {
        Table::new(
            "users",
            [Column::string("id").primary_key(), Column::string("name")],
        )
        .unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let mut tx = store.begin_write().unwrap();
        tx.set("users/1", json!({"id": "1", "name": "John Doe"})).unwrap();
        tx.set("users/2", json!({"id": "2", "name": "Jane Doe"})).unwrap();
        tx.set("users/3", json!({"id": "3", "name": "John Doe"})).unwrap();
        tx.commit();
        store
    }

    fn plan(q: &Select) -> PhysicalOperator {
        plan_physical(&plan_logical(q).unwrap())
    }

    struct FailingTransaction;

    impl ReadTransaction for FailingTransaction {
        fn scan(&self, _prefix: &str) -> StoreResult<Vec<(String, JsonValue)>> {
            Err(StoreError::Aborted("conflict".into()))
        }

        fn get(&self, _key: &str) -> StoreResult<Option<JsonValue>> {
            Err(StoreError::Aborted("conflict".into()))
        }
    }

    #[test]
    fn test_scan_yields_single_entry_rows() {
        let store = seeded();
        let tx = store.begin_read().unwrap();
        let users = users();

        let rows = execute(&plan(&Select::from(&users)), &tx).unwrap();
        assert_eq!(rows.len(), 3);
        for (row, id) in rows.iter().zip(["1", "2", "3"]) {
            assert_eq!(row.tables().collect::<Vec<_>>(), vec!["users"]);
            assert_eq!(row.value("users", "id"), Some(&Value::from(id)));
        }
    }

    #[test]
    fn test_self_join_collision_raised() {
        let store = seeded();
        let tx = store.begin_read().unwrap();
        let users = users();

        let plan = PhysicalOperator::NestedLoopJoin {
            left: Box::new(PhysicalOperator::Scan { table: users.clone() }),
            right: Box::new(PhysicalOperator::Scan { table: users.clone() }),
            join_type: JoinType::Inner,
            on: and([]),
        };
        let err = execute(&plan, &tx).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::RowCollision);
    }

    #[test]
    fn test_left_join_keeps_unmatched_once() {
        let store = seeded();
        let tx = store.begin_read().unwrap();
        let users = users();
        let other = users.alias("other").unwrap();

        let q = Select::from(&users).left_join(
            &other,
            and([
                eq(other.column("id").unwrap(), users.column("id").unwrap()),
                eq(users.column("id").unwrap(), "2"),
            ]),
        );
        let rows = execute(&plan(&q), &tx).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].value("other", "id"), Some(&Value::from("2")));
        assert_eq!(rows[2].len(), 1);
    }

    #[test]
    fn test_search_not_implemented() {
        let store = seeded();
        let tx = store.begin_read().unwrap();
        let plan = PhysicalOperator::Search {
            table: users(),
            column: "id".into(),
            value: Value::from("1"),
        };

        let err = execute(&plan, &tx).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::NotImplemented);
        assert!(err.store_error().is_none());
    }

    #[test]
    fn test_store_error_propagated_unchanged() {
        let users = users();
        let err = execute(&plan(&Select::from(&users)), &FailingTransaction).unwrap_err();

        assert_eq!(err.code(), ExecutorErrorCode::StoreFailure);
        assert_eq!(err.store_error(), Some(&StoreError::Aborted("conflict".into())));
    }

    #[test]
    fn test_undecodable_record_is_corruption() {
        let store = seeded();
        {
            let mut tx = store.begin_write().unwrap();
            tx.set("users/4", json!({"id": 4})).unwrap();
            tx.commit();
        }
        let tx = store.begin_read().unwrap();

        let err = execute(&plan(&Select::from(&users())), &tx).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::DataCorruption);
        assert_eq!(err.key(), Some("users/4"));
    }

    #[test]
    fn test_max_rows_enforced() {
        let store = seeded();
        let tx = store.begin_read().unwrap();
        let users = users();
        let other = users.alias("other").unwrap();
        let q = Select::from(&users).inner_join(
            &other,
            neq(other.column("id").unwrap(), users.column("id").unwrap()),
        );

        let executor = QueryExecutor::new(ExecutorConfig::default().with_max_rows(5));
        let err = executor.execute(&plan(&q), &tx).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::ExecutionLimit);

        let executor = QueryExecutor::new(ExecutorConfig::default().with_max_rows(6));
        assert_eq!(executor.execute(&plan(&q), &tx).unwrap().len(), 6);
    }

    #[test]
    fn test_dyn_transaction() {
        let store = seeded();
        let tx = store.begin_read().unwrap();
        let dyn_tx: &dyn ReadTransaction = &tx;
        let rows = execute(&plan(&Select::from(&users())), dyn_tx).unwrap();
        assert_eq!(rows.len(), 3);
    }
}
