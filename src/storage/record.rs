//! Record codec
//!
//! A stored record is a JSON object mapping column name to a primitive:
//!
//! ```text
//! string  -> JSON string
//! number  -> JSON number (finite only)
//! boolean -> JSON bool
//! date    -> JSON string, RFC 3339 in UTC
//! null    -> JSON null
//! ```
//!
//! Dates are written with as many fractional-second digits as needed, so a
//! decoded date is always equal to the one that was encoded.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value as JsonValue};

use crate::schema::{Column, ColumnType, Table, Value};

use super::errors::{CodecError, CodecResult};

/// A decoded record: column name to value
pub type Record = BTreeMap<String, Value>;

/// Encodes a date in its stored form
pub fn encode_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Decodes a stored date string
pub fn decode_date(column: &str, raw: &str) -> CodecResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| CodecError::InvalidDate {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Encodes one value for the given column
pub fn encode_value(column: &Column, value: &Value) -> CodecResult<JsonValue> {
    if !value.fits(column.column_type()) {
        return Err(CodecError::TypeMismatch {
            column: column.name().to_string(),
            expected: column.column_type(),
            actual: value
                .value_type()
                .map_or("null", |t| t.type_name())
                .to_string(),
        });
    }

    Ok(match value {
        Value::Null => JsonValue::Null,
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Number(n) => Number::from_f64(*n)
            .map(JsonValue::Number)
            .ok_or_else(|| CodecError::NonFiniteNumber {
                column: column.name().to_string(),
            })?,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Date(d) => JsonValue::String(encode_date(d)),
    })
}

/// Decodes one stored value using the column's type
pub fn decode_value(column: &Column, raw: &JsonValue) -> CodecResult<Value> {
    let mismatch = || CodecError::TypeMismatch {
        column: column.name().to_string(),
        expected: column.column_type(),
        actual: json_type_name(raw).to_string(),
    };

    match (column.column_type(), raw) {
        (_, JsonValue::Null) => Ok(Value::Null),
        (ColumnType::String, JsonValue::String(s)) => Ok(Value::String(s.clone())),
        (ColumnType::Number, JsonValue::Number(n)) => {
            n.as_f64().map(Value::Number).ok_or_else(mismatch)
        }
        (ColumnType::Boolean, JsonValue::Bool(b)) => Ok(Value::Boolean(*b)),
        (ColumnType::Date, JsonValue::String(s)) => decode_date(column.name(), s).map(Value::Date),
        _ => Err(mismatch()),
    }
}

/// Encodes a record for storage.
///
/// Every key must be a column of `table`.
pub fn encode_record(table: &Table, record: &Record) -> CodecResult<Map<String, JsonValue>> {
    let mut out = Map::new();
    for (name, value) in record {
        let column = table
            .find_column(name)
            .ok_or_else(|| CodecError::UnknownColumn {
                table: table.name().to_string(),
                column: name.clone(),
            })?;
        out.insert(name.clone(), encode_value(column, value)?);
    }
    Ok(out)
}

/// Decodes a stored record using the table's column types.
///
/// Fields that are not declared columns are dropped.
pub fn decode_record(table: &Table, key: &str, raw: &JsonValue) -> CodecResult<Record> {
    let object = raw.as_object().ok_or_else(|| CodecError::NotAnObject {
        key: key.to_string(),
    })?;

    let mut record = Record::new();
    for (name, value) in object {
        if let Some(column) = table.find_column(name) {
            record.insert(name.clone(), decode_value(column, value)?);
        }
    }
    Ok(record)
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
