//! Error taxonomy for catalog construction, diffing and fragment ordering.

use crate::catalog::id::DbObjectId;
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The kind of entity an error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Schema,
    Table,
    Column,
    PrimaryKey,
    ForeignKey,
    UniqueConstraint,
    Validation,
    Index,
    Trigger,
    Function,
    Enum,
    Extension,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Schema => "schema",
            ObjectKind::Table => "table",
            ObjectKind::Column => "column",
            ObjectKind::PrimaryKey => "primary key",
            ObjectKind::ForeignKey => "foreign key",
            ObjectKind::UniqueConstraint => "unique constraint",
            ObjectKind::Validation => "validation",
            ObjectKind::Index => "index",
            ObjectKind::Trigger => "trigger",
            ObjectKind::Function => "function",
            ObjectKind::Enum => "enum",
            ObjectKind::Extension => "extension",
        };
        f.write_str(name)
    }
}

fn in_parent(parent: &Option<DbObjectId>) -> String {
    match parent {
        Some(parent) => format!(" in {parent}"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed construction input.
    #[error("invalid {object} `{name}`: {reason}")]
    Validation {
        object: ObjectKind,
        name: String,
        reason: String,
    },

    #[error("{object} `{name}` already exists{}", in_parent(.parent))]
    AlreadyExists {
        object: ObjectKind,
        name: String,
        parent: Option<DbObjectId>,
    },

    #[error("{object} `{name}` not found{}", in_parent(.parent))]
    NotFound {
        object: ObjectKind,
        name: String,
        parent: Option<DbObjectId>,
    },

    /// The normalization oracle could not produce a canonical form.
    #[error("failed to normalize {object} `{name}`{}", in_parent(.parent))]
    Normalization {
        object: ObjectKind,
        name: String,
        parent: Option<DbObjectId>,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

impl Error {
    pub fn validation(object: ObjectKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            object,
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(object: ObjectKind, name: impl Into<String>, parent: Option<DbObjectId>) -> Self {
        Error::NotFound {
            object,
            name: name.into(),
            parent,
        }
    }
}

/// Cross-entity invariant breaches. These indicate a bug upstream of the
/// failing call rather than bad user input.
#[derive(Debug, Error)]
pub enum ConsistencyError {
    #[error("cannot add {object} `{name}` built from {child} data to a {parent} tree")]
    MixedProvenance {
        object: ObjectKind,
        name: String,
        parent: &'static str,
        child: &'static str,
    },

    #[error(
        "trigger `{trigger}` on {table} uses function `{function_schema}.{function}` from another schema"
    )]
    TriggerFunctionSchema {
        trigger: String,
        table: DbObjectId,
        function_schema: String,
        function: String,
    },

    #[error("migration `{unit}` belongs to schema `{expected}` but received a fragment for `{found}`")]
    UnexpectedSchema {
        unit: String,
        expected: String,
        found: String,
    },

    #[error("migration `{unit}` does not support `{kind}` fragments")]
    UnexpectedMigrationMethodName { unit: String, kind: String },

    #[error("migration `{unit}` has no fragments")]
    NoFragments { unit: String },

    #[error("could not order migrations, unresolved: {}", .units.join(", "))]
    UnresolvedOrdering { units: Vec<String> },
}
