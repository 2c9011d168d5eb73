//! Key format
//!
//! ```text
//! <namespace>/<pk value 1>/<pk value 2>/...
//! ```
//!
//! Primary key values appear in the table's declared primary key order.
//! A table scan reads everything under `<namespace>/`.

use crate::schema::{Table, Value, KEY_SEPARATOR};

use super::errors::{CodecError, CodecResult};
use super::record::{encode_date, Record};

/// Prefix covering every record of the table
pub fn table_prefix(table: &Table) -> String {
    format!("{}{}", table.namespace(), KEY_SEPARATOR)
}

/// Stringifies one primary key value; None for null
pub fn key_component(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Date(d) => Some(encode_date(d)),
    }
}

/// Builds the key a record is stored under
///
/// A component containing the separator is rejected, so distinct primary
/// keys never share a store key.
pub fn record_key(table: &Table, record: &Record) -> CodecResult<String> {
    let mut key = table.namespace().to_string();
    for pk in table.primary_keys() {
        let component = record
            .get(pk)
            .and_then(key_component)
            .ok_or_else(|| CodecError::MissingPrimaryKey {
                table: table.name().to_string(),
                column: pk.clone(),
            })?;
        if component.contains(KEY_SEPARATOR) {
            return Err(CodecError::InvalidKeyComponent {
                table: table.name().to_string(),
                column: pk.clone(),
                value: component,
            });
        }
        key.push(KEY_SEPARATOR);
        key.push_str(&component);
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_prefix_uses_namespace() {
        let users = Table::new("users", [Column::string("id").primary_key()]).unwrap();
        let other = users.alias("other").unwrap();
        assert_eq!(table_prefix(&users), "users/");
        assert_eq!(table_prefix(&other), "users/");
    }

    #[test]
    fn test_composite_key_order() {
        let table = Table::new(
            "memberships",
            [
                Column::string("org").primary_key(),
                Column::string("note"),
                Column::number("seq").primary_key(),
            ],
        )
        .unwrap();

        let mut record = Record::new();
        record.insert("seq".into(), Value::from(7));
        record.insert("org".into(), Value::from("acme"));
        record.insert("note".into(), Value::from("x"));

        assert_eq!(record_key(&table, &record).unwrap(), "memberships/acme/7");
    }

    #[test]
    fn test_key_components() {
        assert_eq!(key_component(&Value::from(1.5)), Some("1.5".into()));
        assert_eq!(key_component(&Value::from(42)), Some("42".into()));
        assert_eq!(key_component(&Value::from(false)), Some("false".into()));
        let d = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(key_component(&Value::from(d)), Some("2024-05-01T00:00:00Z".into()));
        assert_eq!(key_component(&Value::Null), None);
    }

    #[test]
    fn test_missing_primary_key() {
        let table = Table::new("users", [Column::string("id").primary_key()]).unwrap();
        let err = record_key(&table, &Record::new()).unwrap_err();
        assert!(matches!(err, CodecError::MissingPrimaryKey { ref column, .. } if column == "id"));
    }

    #[test]
    fn test_separator_in_component_rejected() {
        let table = Table::new(
            "k",
            [Column::string("a").primary_key(), Column::string("b").primary_key()],
        )
        .unwrap();

        let mut left = Record::new();
        left.insert("a".into(), Value::from("x/y"));
        left.insert("b".into(), Value::from("z"));
        let err = record_key(&table, &left).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidKeyComponent { ref column, ref value, .. }
                if column == "a" && value == "x/y"
        ));

        let mut right = Record::new();
        right.insert("a".into(), Value::from("x"));
        right.insert("b".into(), Value::from("y/z"));
        assert!(record_key(&table, &right).is_err());
    }
}
