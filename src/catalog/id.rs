use serde::Serialize;
use std::fmt;

/// Identifies the container an entity lives in, for error context and
/// dependency declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DbObjectId {
    Schema { name: String },
    Table { schema: String, name: String },
}

impl DbObjectId {
    pub fn schema(name: impl Into<String>) -> Self {
        DbObjectId::Schema { name: name.into() }
    }

    pub fn table(schema: impl Into<String>, name: impl Into<String>) -> Self {
        DbObjectId::Table {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// The schema this object belongs to. For a schema id, its own name.
    pub fn schema_name(&self) -> &str {
        match self {
            DbObjectId::Schema { name } => name,
            DbObjectId::Table { schema, .. } => schema,
        }
    }
}

impl fmt::Display for DbObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema { name } => write!(f, "schema {name}"),
            Self::Table { schema, name } => write!(f, "table {schema}.{name}"),
        }
    }
}

/// A `(schema, table)` pair, used as a fragment dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

impl From<&TableRef> for DbObjectId {
    fn from(table: &TableRef) -> Self {
        DbObjectId::table(&table.schema, &table.table)
    }
}
