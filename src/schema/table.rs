//! Table and column definitions
//!
//! Tables are immutable once built and shared as `Arc<Table>`. Every table
//! instance gets its own identity, so an alias of a table is a different
//! table even though it reads the same storage namespace.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnType, Value};

/// Separator used between key components in the store
pub const KEY_SEPARATOR: char = '/';

/// Zero-argument value producer evaluated at insert time
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Default applied to a column when an inserted row omits it
#[derive(Clone)]
pub enum DefaultValue {
    /// Fixed value
    Literal(Value),
    /// Called once per inserted row
    Function(DefaultFn),
}

impl DefaultValue {
    /// Produces the default for one row
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Literal(v) => v.clone(),
            DefaultValue::Function(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            DefaultValue::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Non-owning reference to the table a column belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdent {
    pub id: Uuid,
    pub name: String,
}

/// A typed column
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    primary_key: bool,
    default: Option<DefaultValue>,
    table: Option<TableIdent>,
}

impl Column {
    fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
            default: None,
            table: None,
        }
    }

    /// Create a string column
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    /// Create a number column
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Number)
    }

    /// Create a boolean column
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// Create a date column
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Date)
    }

    /// Marks the column as part of the primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Sets a literal default
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Sets a default computed for every inserted row
    pub fn default_fn(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::Function(Arc::new(f)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Owning table, or None for a standalone column
    pub fn table(&self) -> Option<&TableIdent> {
        self.table.as_ref()
    }

    /// Columns are equal when they share owning table identity and name
    pub fn same_as(&self, other: &Column) -> bool {
        self.table == other.table && self.name == other.name
    }
}

/// An immutable table definition
#[derive(Debug)]
pub struct Table {
    id: Uuid,
    name: String,
    namespace: String,
    columns: Vec<Column>,
    primary_keys: Vec<String>,
}

impl Table {
    /// Builds a table from its columns in declared order.
    ///
    /// # Errors
    ///
    /// - invalid table or column name
    /// - duplicate column name
    /// - literal default not matching its column type
    /// - no primary key column
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = Column>,
    ) -> SchemaResult<Arc<Table>> {
        let name = name.into();
        validate_name(&name)?;
        let columns: Vec<Column> = columns.into_iter().collect();

        for (i, column) in columns.iter().enumerate() {
            validate_name(&column.name)?;
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::duplicate_column(&name, &column.name));
            }
            if let Some(DefaultValue::Literal(v)) = &column.default {
                if !v.fits(column.column_type) {
                    return Err(SchemaError::default_type_mismatch(
                        &column.name,
                        column.column_type,
                        v.value_type().map_or("null", |t| t.type_name()),
                    ));
                }
            }
        }

        Self::assemble(Uuid::new_v4(), name.clone(), name, columns)
    }

    /// Creates a distinct table instance over the same records.
    ///
    /// The alias has its own identity and name but scans the namespace of
    /// the table it was created from.
    pub fn alias(&self, name: impl Into<String>) -> SchemaResult<Arc<Table>> {
        let name = name.into();
        validate_name(&name)?;
        Self::assemble(
            Uuid::new_v4(),
            name,
            self.namespace.clone(),
            self.columns.clone(),
        )
    }

    fn assemble(
        id: Uuid,
        name: String,
        namespace: String,
        mut columns: Vec<Column>,
    ) -> SchemaResult<Arc<Table>> {
        let ident = TableIdent {
            id,
            name: name.clone(),
        };
        for column in &mut columns {
            column.table = Some(ident.clone());
        }

        let primary_keys: Vec<String> = columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect();
        if primary_keys.is_empty() {
            return Err(SchemaError::no_primary_key(&name));
        }

        Ok(Arc::new(Table {
            id,
            name,
            namespace,
            columns,
            primary_keys,
        }))
    }

    /// Unique identity of this instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name or alias, used as the row entry key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage namespace the table's records live under
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn ident(&self) -> TableIdent {
        TableIdent {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Columns in declared order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Primary key column names in declared order
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> SchemaResult<&Column> {
        self.find_column(name)
            .ok_or_else(|| SchemaError::unknown_column(&self.name, name))
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns true if the column belongs to this table instance
    pub fn owns(&self, column: &Column) -> bool {
        column.table.as_ref().map_or(false, |t| t.id == self.id)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Table {}

fn validate_name(name: &str) -> SchemaResult<()> {
    if name.is_empty() {
        return Err(SchemaError::invalid_name(name, "must not be empty"));
    }
    if name.contains(KEY_SEPARATOR) {
        return Err(SchemaError::invalid_name(
            name,
            "must not contain the key separator '/'",
        ));
    }
    Ok(())
}
