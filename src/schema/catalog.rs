//! Table catalog
//!
//! Holds the application's tables by name. Names are unique within a
//! catalog; registering a second table under an existing name is rejected
//! rather than replacing the first.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::table::{Column, Table};
use super::types::ColumnType;

/// Serializable column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub primary_key: bool,
}

/// Serializable table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Builds the table described by this definition
    pub fn build(&self) -> SchemaResult<Arc<Table>> {
        let columns = self.columns.iter().map(|def| {
            let column = match def.column_type {
                ColumnType::String => Column::string(&def.name),
                ColumnType::Number => Column::number(&def.name),
                ColumnType::Boolean => Column::boolean(&def.name),
                ColumnType::Date => Column::date(&def.name),
            };
            if def.primary_key {
                column.primary_key()
            } else {
                column
            }
        });
        Table::new(&self.name, columns)
    }
}

/// Registry of tables keyed by name
#[derive(Debug, Default)]
pub struct Catalog {
    tables: BTreeMap<String, Arc<Table>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table.
    ///
    /// Fails if a table with the same name is already present.
    pub fn register(&mut self, table: Arc<Table>) -> SchemaResult<Arc<Table>> {
        if self.tables.contains_key(table.name()) {
            return Err(SchemaError::duplicate_table(table.name()));
        }
        self.tables.insert(table.name().to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Parses a JSON array of table definitions and registers each one.
    ///
    /// Either every table is registered or none is.
    pub fn load_json_str(&mut self, json: &str) -> SchemaResult<Vec<Arc<Table>>> {
        let defs: Vec<TableDef> = serde_json::from_str(json)
            .map_err(|e| SchemaError::malformed_definition(format!("Invalid JSON: {}", e)))?;

        let mut built = Vec::with_capacity(defs.len());
        for def in &defs {
            let table = def.build()?;
            let clashes = self.tables.contains_key(table.name())
                || built.iter().any(|t: &Arc<Table>| t.name() == table.name());
            if clashes {
                return Err(SchemaError::duplicate_table(table.name()));
            }
            built.push(table);
        }

        for table in &built {
            self.tables.insert(table.name().to_string(), Arc::clone(table));
        }
        Ok(built)
    }

    /// Gets a table by name
    pub fn get(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.get(name)
    }

    /// Registered table names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
