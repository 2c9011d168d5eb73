//! Query Semantics Tests
//!
//! End-to-end select behavior against the in-memory store:
//! - Single-table scans and filters
//! - Inner, left and multi-level joins over aliased tables
//! - Validation before any store access
//! - Deterministic, repeatable output

use std::sync::Arc;

use relkv::executor::{execute, ExecutorErrorCode, Row};
use relkv::filter::{and, eq, neq, or};
use relkv::planner::{plan_logical, plan_physical, PhysicalOperator, PlannerErrorCode};
use relkv::query::Select;
use relkv::schema::{Column, Table, Value};
use relkv::storage::{MemoryStore, ReadTransaction, StoreError, StoreResult, WriteTransaction};
use relkv::Error;
use serde_json::{json, Value as JsonValue};

// =============================================================================
// Helper Functions
// =============================================================================

fn users_table() -> Arc<Table> {
    Table::new(
        "users",
        [Column::string("id").primary_key(), Column::string("name")],
    )
    .unwrap()
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let mut tx = store.begin_write().unwrap();
    tx.set("users/1", json!({"id": "1", "name": "John Doe"})).unwrap();
    tx.set("users/2", json!({"id": "2", "name": "Jane Doe"})).unwrap();
    tx.set("users/3", json!({"id": "3", "name": "John Doe"})).unwrap();
    tx.set("posts/p1", json!({"id": "p1", "author": "1"})).unwrap();
    tx.commit();
    store
}

fn ids(rows: &[Row], table: &str) -> Vec<Value> {
    rows.iter()
        .map(|r| r.value(table, "id").cloned().unwrap_or(Value::Null))
        .collect()
}

// =============================================================================
// Single Table Tests
// =============================================================================

/// No filter: one single-entry row per stored record of the table.
#[test]
fn test_scan_returns_every_record() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();

    let rows = Select::from(&users).execute(&tx).unwrap();

    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.tables().collect::<Vec<_>>(), vec!["users"]);
    }
}

#[test]
fn test_eq_on_primary_key() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();

    let rows = Select::from(&users)
        .filter(eq(users.column("id").unwrap(), "1"))
        .execute(&tx)
        .unwrap();

    assert_eq!(ids(&rows, "users"), vec![Value::from("1")]);
}

#[test]
fn test_and_neq_eq() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();

    let rows = Select::from(&users)
        .filter(and([
            neq(users.column("id").unwrap(), "1"),
            eq(users.column("name").unwrap(), "John Doe"),
        ]))
        .execute(&tx)
        .unwrap();

    assert_eq!(ids(&rows, "users"), vec![Value::from("3")]);
}

#[test]
fn test_or_filter() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();
    let id = users.column("id").unwrap();

    let rows = Select::from(&users)
        .filter(or([eq(id, "3"), eq(id, "2")]))
        .execute(&tx)
        .unwrap();

    // Store key order, not filter order
    assert_eq!(ids(&rows, "users"), vec![Value::from("2"), Value::from("3")]);
}

// =============================================================================
// Join Tests
// =============================================================================

/// Each row paired with every other distinct row: 3 × 3 − 3.
#[test]
fn test_self_inner_join_via_alias() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();
    let other = users.alias("other").unwrap();

    let rows = Select::from(&users)
        .inner_join(
            &other,
            neq(other.column("id").unwrap(), users.column("id").unwrap()),
        )
        .execute(&tx)
        .unwrap();

    assert_eq!(rows.len(), 6);
    for row in &rows {
        assert_ne!(row.value("users", "id"), row.value("other", "id"));
    }
}

#[test]
fn test_left_join_without_matches_keeps_base_rows() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();
    let other = users.alias("other").unwrap();

    let rows = Select::from(&users)
        .left_join(&other, eq(other.column("id").unwrap(), "nobody"))
        .execute(&tx)
        .unwrap();

    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.tables().collect::<Vec<_>>(), vec!["users"]);
        assert!(row.get("other").is_none());
    }
}

#[test]
fn test_triple_join_always_true() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();
    let a = users.alias("a").unwrap();
    let b = users.alias("b").unwrap();

    let rows = Select::from(&users)
        .inner_join(&a, and([]))
        .inner_join(&b, and([]))
        .execute(&tx)
        .unwrap();

    assert_eq!(rows.len(), 27);
    assert!(rows.iter().all(|r| r.len() == 3));
}

#[test]
fn test_join_across_tables_with_where() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();
    let posts = Table::new(
        "posts",
        [Column::string("id").primary_key(), Column::string("author")],
    )
    .unwrap();

    let rows = Select::from(&users)
        .left_join(
            &posts,
            eq(posts.column("author").unwrap(), users.column("id").unwrap()),
        )
        .filter(eq(users.column("name").unwrap(), "John Doe"))
        .execute(&tx)
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value("posts", "id"), Some(&Value::from("p1")));
    assert!(rows[1].get("posts").is_none());
}

/// A where filter on the right side of a left join sees null for unmatched rows.
#[test]
fn test_where_after_left_join_sees_null() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();
    let posts = Table::new(
        "posts",
        [Column::string("id").primary_key(), Column::string("author")],
    )
    .unwrap();

    let rows = Select::from(&users)
        .left_join(
            &posts,
            eq(posts.column("author").unwrap(), users.column("id").unwrap()),
        )
        .filter(eq(posts.column("id").unwrap(), Value::Null))
        .execute(&tx)
        .unwrap();

    assert_eq!(ids(&rows, "users"), vec![Value::from("2"), Value::from("3")]);
}

// =============================================================================
// Validation and Error Tests
// =============================================================================

#[test]
fn test_validation_names_first_offending_table() {
    let users = users_table();
    let posts = Table::new("posts", [Column::string("id").primary_key()]).unwrap();
    let tags = Table::new("tags", [Column::string("id").primary_key()]).unwrap();
    let other = users.alias("other").unwrap();

    let q = Select::from(&users)
        .inner_join(&other, eq(tags.column("id").unwrap(), "t"))
        .filter(eq(posts.column("id").unwrap(), "p"));

    let err = q.validate().unwrap_err();
    assert_eq!(err.code(), PlannerErrorCode::TableNotInQuery);
    assert_eq!(err.table(), Some("posts"));
}

/// Validation fails before the store is touched.
#[test]
fn test_invalid_query_never_reads_store() {
    struct PanickingTransaction;

    impl ReadTransaction for PanickingTransaction {
        fn scan(&self, _prefix: &str) -> StoreResult<Vec<(String, JsonValue)>> {
            panic!("store must not be read");
        }

        fn get(&self, _key: &str) -> StoreResult<Option<JsonValue>> {
            panic!("store must not be read");
        }
    }

    let users = users_table();
    let posts = Table::new("posts", [Column::string("id").primary_key()]).unwrap();
    let q = Select::from(&users).filter(eq(posts.column("id").unwrap(), "p"));

    let err = q.execute(&PanickingTransaction).unwrap_err();
    assert!(matches!(err, Error::Planner(_)));
}

#[test]
fn test_aborted_transaction_fails_query() {
    struct AbortedTransaction;

    impl ReadTransaction for AbortedTransaction {
        fn scan(&self, _prefix: &str) -> StoreResult<Vec<(String, JsonValue)>> {
            Err(StoreError::Aborted("deadline".into()))
        }

        fn get(&self, _key: &str) -> StoreResult<Option<JsonValue>> {
            Err(StoreError::Aborted("deadline".into()))
        }
    }

    let users = users_table();
    let err = Select::from(&users).execute(&AbortedTransaction).unwrap_err();

    assert_eq!(err.store_error(), Some(&StoreError::Aborted("deadline".into())));
}

#[test]
fn test_search_operator_not_implemented() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();

    let plan = PhysicalOperator::Search {
        table: users_table(),
        column: "id".into(),
        value: Value::from("1"),
    };

    let err = execute(&plan, &tx).unwrap_err();
    assert_eq!(err.code(), ExecutorErrorCode::NotImplemented);
}

#[test]
fn test_mixed_type_comparison_is_error() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();

    let err = Select::from(&users)
        .filter(eq(users.column("name").unwrap(), 7))
        .execute(&tx)
        .unwrap_err();

    assert_eq!(err.code(), "RELKV_EXECUTION_TYPE_MISMATCH");
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same plan, unmodified store: identical rows in identical order.
#[test]
fn test_execution_is_idempotent() {
    let store = seeded_store();
    let tx = store.begin_read().unwrap();
    let users = users_table();
    let other = users.alias("other").unwrap();

    let q = Select::from(&users).left_join(
        &other,
        neq(other.column("id").unwrap(), users.column("id").unwrap()),
    );
    let plan = plan_physical(&plan_logical(&q).unwrap());

    let first = execute(&plan, &tx).unwrap();
    for _ in 0..10 {
        assert_eq!(execute(&plan, &tx).unwrap(), first);
    }
}
