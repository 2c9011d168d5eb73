//! Mutation Round-Trip Tests
//!
//! Insert, update and delete through a write transaction, read back with
//! select queries:
//! - Defaults applied at insert time
//! - Dates survive storage unchanged
//! - Primary key changes move the record
//! - Uncommitted work is invisible

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use relkv::filter::{eq, gte, lt};
use relkv::mutation::{delete_from, insert, update, MutationErrorCode};
use relkv::query::Select;
use relkv::schema::{Catalog, Column, SchemaErrorCode, Table, Value};
use relkv::storage::{MemoryStore, ReadTransaction, Record};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn events_table() -> Arc<Table> {
    Table::new(
        "events",
        [
            Column::string("id").primary_key(),
            Column::string("title"),
            Column::date("at"),
            Column::boolean("archived").default_value(false),
        ],
    )
    .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
}

fn seed(store: &MemoryStore, events: &Arc<Table>) {
    let mut tx = store.begin_write().unwrap();
    insert(events)
        .values([
            record(&[("id", "e1".into()), ("title", "launch".into()), ("at", date(2024, 1, 10).into())]),
            record(&[("id", "e2".into()), ("title", "review".into()), ("at", date(2024, 3, 5).into())]),
            record(&[("id", "e3".into()), ("title", "retro".into()), ("at", date(2024, 6, 20).into())]),
        ])
        .execute(&mut tx)
        .unwrap();
    tx.commit();
}

// =============================================================================
// Insert Tests
// =============================================================================

#[test]
fn test_insert_then_select() {
    let store = MemoryStore::new();
    let events = events_table();
    seed(&store, &events);

    let tx = store.begin_read().unwrap();
    let rows = Select::from(&events).execute(&tx).unwrap();

    assert_eq!(rows.len(), 3);
    let first = rows[0].get("events").unwrap();
    assert_eq!(first["at"], Value::from(date(2024, 1, 10)));
    assert_eq!(first["archived"], Value::from(false));
}

#[test]
fn test_stored_form_of_dates() {
    let store = MemoryStore::new();
    let events = events_table();
    seed(&store, &events);

    let tx = store.begin_read().unwrap();
    assert_eq!(
        tx.get("events/e2").unwrap(),
        Some(json!({"id": "e2", "title": "review", "at": "2024-03-05T09:30:00Z", "archived": false}))
    );
}

#[test]
fn test_sub_second_dates_round_trip() {
    let store = MemoryStore::new();
    let events = events_table();
    let precise = date(2024, 2, 29).with_nanosecond(987_654_321).unwrap();

    let mut tx = store.begin_write().unwrap();
    insert(&events)
        .value(record(&[("id", "p".into()), ("at", precise.into())]))
        .execute(&mut tx)
        .unwrap();
    tx.commit();

    let tx = store.begin_read().unwrap();
    let rows = Select::from(&events)
        .filter(eq(events.column("at").unwrap(), precise))
        .execute(&tx)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("events", "at"), Some(&Value::from(precise)));
}

#[test]
fn test_date_range_filter() {
    let store = MemoryStore::new();
    let events = events_table();
    seed(&store, &events);
    let at = events.column("at").unwrap();

    let tx = store.begin_read().unwrap();
    let rows = Select::from(&events)
        .filter(relkv::filter::and([gte(at, date(2024, 2, 1)), lt(at, date(2024, 6, 1))]))
        .execute(&tx)
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("events", "id"), Some(&Value::from("e2")));
}

// =============================================================================
// Update and Delete Tests
// =============================================================================

#[test]
fn test_update_then_select() {
    let store = MemoryStore::new();
    let events = events_table();
    seed(&store, &events);
    let at = events.column("at").unwrap();

    let mut tx = store.begin_write().unwrap();
    let updated = update(&events)
        .set([("archived", true)])
        .filter(lt(at, date(2024, 4, 1)))
        .execute(&mut tx)
        .unwrap();
    tx.commit();
    assert_eq!(updated, 2);

    let tx = store.begin_read().unwrap();
    let archived = Select::from(&events)
        .filter(eq(events.column("archived").unwrap(), true))
        .execute(&tx)
        .unwrap();
    assert_eq!(archived.len(), 2);
}

#[test]
fn test_update_primary_key_moves_record() {
    let store = MemoryStore::new();
    let events = events_table();
    seed(&store, &events);

    let mut tx = store.begin_write().unwrap();
    update(&events)
        .set([("id", "e9")])
        .filter(eq(events.column("id").unwrap(), "e1"))
        .execute(&mut tx)
        .unwrap();
    tx.commit();

    let tx = store.begin_read().unwrap();
    assert_eq!(tx.get("events/e1").unwrap(), None);
    let moved = tx.get("events/e9").unwrap().unwrap();
    assert_eq!(moved["title"], json!("launch"));
    assert_eq!(tx.scan("events/").unwrap().len(), 3);
}

#[test]
fn test_delete_then_select() {
    let store = MemoryStore::new();
    let events = events_table();
    seed(&store, &events);

    let mut tx = store.begin_write().unwrap();
    let deleted = delete_from(&events)
        .filter(eq(events.column("title").unwrap(), "review"))
        .execute(&mut tx)
        .unwrap();
    tx.commit();
    assert_eq!(deleted, 1);

    let tx = store.begin_read().unwrap();
    let rows = Select::from(&events).execute(&tx).unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r.value("events", "id").cloned()).collect();
    assert_eq!(ids, vec![Some(Value::from("e1")), Some(Value::from("e3"))]);
}

#[test]
fn test_rolled_back_mutation_invisible() {
    let store = MemoryStore::new();
    let events = events_table();
    seed(&store, &events);

    {
        let mut tx = store.begin_write().unwrap();
        delete_from(&events).execute(&mut tx).unwrap();
        assert!(tx.scan("events/").unwrap().is_empty());
        tx.rollback();
    }

    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn test_insert_type_mismatch_rejected() {
    let store = MemoryStore::new();
    let events = events_table();

    let mut tx = store.begin_write().unwrap();
    let err = insert(&events)
        .value(record(&[("id", "x".into()), ("at", "tomorrow".into())]))
        .execute(&mut tx)
        .unwrap_err();

    assert_eq!(err.code(), MutationErrorCode::TypeMismatch);
}

// =============================================================================
// Schema Tests
// =============================================================================

#[test]
fn test_table_without_primary_key_rejected() {
    let err = Table::new("logs", [Column::string("line")]).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::NoPrimaryKey);

    let err = Table::new("logs", Vec::new()).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::NoPrimaryKey);
}

#[test]
fn test_catalog_tables_usable_in_queries() {
    let mut catalog = Catalog::new();
    catalog
        .load_json_str(
            r#"[{"name": "notes", "columns": [
                {"name": "id", "type": "number", "primary_key": true},
                {"name": "body", "type": "string"}
            ]}]"#,
        )
        .unwrap();
    let notes = Arc::clone(catalog.get("notes").unwrap());

    let store = MemoryStore::new();
    let mut tx = store.begin_write().unwrap();
    insert(&notes)
        .value(record(&[("id", 7.into()), ("body", "hello".into())]))
        .execute(&mut tx)
        .unwrap();
    tx.commit();

    let tx = store.begin_read().unwrap();
    assert!(tx.get("notes/7").unwrap().is_some());
    let rows = Select::from(&notes)
        .filter(eq(notes.column("id").unwrap(), 7))
        .execute(&tx)
        .unwrap();
    assert_eq!(rows.len(), 1);
}
