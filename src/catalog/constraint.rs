use super::collection::Named;
use super::comments::Commentable;
use super::normalize::{NormalizedClause, Normalizer};
use super::table::Table;
use super::utils::{validate_column_list, validate_identifier};
use super::{Provenance, Provenanced};
use crate::error::{Error, ObjectKind, Result};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INDEX_TYPE: &str = "btree";

/// ON UPDATE / ON DELETE behavior of a foreign key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Maps `pg_constraint.confupdtype` / `confdeltype` codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(Self::NoAction),
            "r" => Some(Self::Restrict),
            "c" => Some(Self::Cascade),
            "n" => Some(Self::SetNull),
            "d" => Some(Self::SetDefault),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

macro_rules! constraint_common {
    ($ty:ty, $kind:expr) => {
        impl Named for $ty {
            const KIND: ObjectKind = $kind;

            fn name(&self) -> &str {
                &self.name
            }
        }

        impl Provenanced for $ty {
            fn provenance(&self) -> Provenance {
                self.provenance
            }
        }

        impl Commentable for $ty {
            fn description(&self) -> Option<&str> {
                self.description.as_deref()
            }
        }
    };
}

fn checked_columns(kind: ObjectKind, name: &str, columns: Vec<String>) -> Result<Vec<String>> {
    validate_identifier(kind, name)?;
    validate_column_list(kind, name, &columns)?;
    Ok(columns)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    provenance: Provenance,
    name: String,
    columns: Vec<String>,
    pub index_type: String,
    pub description: Option<String>,
}

constraint_common!(PrimaryKey, ObjectKind::PrimaryKey);

impl PrimaryKey {
    pub fn new(provenance: Provenance, name: impl Into<String>, columns: Vec<String>) -> Result<Self> {
        let name = name.into();
        let columns = checked_columns(ObjectKind::PrimaryKey, &name, columns)?;
        Ok(Self {
            provenance,
            name,
            columns,
            index_type: DEFAULT_INDEX_TYPE.to_string(),
            description: None,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyConstraint {
    provenance: Provenance,
    name: String,
    columns: Vec<String>,
    pub foreign_schema: String,
    pub foreign_table: String,
    foreign_columns: Vec<String>,
    pub deferrable: bool,
    pub initially_deferred: bool,
    pub on_update: ReferentialAction,
    pub on_delete: ReferentialAction,
    pub description: Option<String>,
}

constraint_common!(ForeignKeyConstraint, ObjectKind::ForeignKey);

impl ForeignKeyConstraint {
    /// Local and foreign column lists must be non-empty and of equal length.
    /// Column existence is checked when the key is added to a catalog.
    pub fn new(
        provenance: Provenance,
        name: impl Into<String>,
        columns: Vec<String>,
        foreign_schema: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_columns: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        let columns = checked_columns(ObjectKind::ForeignKey, &name, columns)?;
        validate_column_list(ObjectKind::ForeignKey, &name, &foreign_columns)?;
        if columns.len() != foreign_columns.len() {
            return Err(Error::validation(
                ObjectKind::ForeignKey,
                name,
                format!(
                    "{} local columns but {} foreign columns",
                    columns.len(),
                    foreign_columns.len()
                ),
            ));
        }
        Ok(Self {
            provenance,
            name,
            columns,
            foreign_schema: foreign_schema.into(),
            foreign_table: foreign_table.into(),
            foreign_columns,
            deferrable: false,
            initially_deferred: false,
            on_update: ReferentialAction::NoAction,
            on_delete: ReferentialAction::NoAction,
            description: None,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn foreign_column_names(&self) -> &[String] {
        &self.foreign_columns
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    provenance: Provenance,
    name: String,
    columns: Vec<String>,
    pub index_type: String,
    pub deferrable: bool,
    pub initially_deferred: bool,
    pub description: Option<String>,
}

constraint_common!(UniqueConstraint, ObjectKind::UniqueConstraint);

impl UniqueConstraint {
    pub fn new(provenance: Provenance, name: impl Into<String>, columns: Vec<String>) -> Result<Self> {
        let name = name.into();
        let columns = checked_columns(ObjectKind::UniqueConstraint, &name, columns)?;
        Ok(Self {
            provenance,
            name,
            columns,
            index_type: DEFAULT_INDEX_TYPE.to_string(),
            deferrable: false,
            initially_deferred: false,
            description: None,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }
}

/// A check constraint.
///
/// The column list may be given up front or left to be resolved from the
/// clause. Resolution goes through the [`Normalizer`] once per instance and
/// the result is cached for the lifetime of the validation, so a validation
/// can be built before its table's columns are all known.
#[derive(Debug, Clone)]
pub struct Validation {
    provenance: Provenance,
    name: String,
    pub check_clause: String,
    columns: Option<Vec<String>>,
    pub deferrable: bool,
    pub initially_deferred: bool,
    pub description: Option<String>,
    normalized: OnceCell<NormalizedClause>,
}

constraint_common!(Validation, ObjectKind::Validation);

impl Validation {
    pub fn new(
        provenance: Provenance,
        name: impl Into<String>,
        check_clause: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let check_clause = check_clause.into();
        validate_identifier(ObjectKind::Validation, &name)?;
        if check_clause.trim().is_empty() {
            return Err(Error::validation(
                ObjectKind::Validation,
                name,
                "check clause must not be empty",
            ));
        }
        Ok(Self {
            provenance,
            name,
            check_clause,
            columns: None,
            deferrable: false,
            initially_deferred: false,
            description: None,
            normalized: OnceCell::new(),
        })
    }

    pub fn set_column_names(&mut self, columns: Vec<String>) -> Result<()> {
        validate_column_list(ObjectKind::Validation, &self.name, &columns)?;
        self.columns = Some(columns);
        Ok(())
    }

    pub fn explicit_column_names(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Canonical form of the clause, computed on first call and cached.
    pub fn normalized(
        &self,
        table: &Table,
        normalizer: &dyn Normalizer,
    ) -> Result<&NormalizedClause> {
        self.normalized.get_or_try_init(|| {
            normalizer
                .normalize_check_clause(&table.column_shapes(), &self.check_clause)
                .map_err(|source| Error::Normalization {
                    object: ObjectKind::Validation,
                    name: self.name.clone(),
                    parent: Some(table.id()),
                    source,
                })
        })
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized.get().is_some()
    }

    /// Explicit columns if given, otherwise the columns the clause references.
    pub fn column_names<'a>(
        &'a self,
        table: &Table,
        normalizer: &dyn Normalizer,
    ) -> Result<&'a [String]> {
        match &self.columns {
            Some(columns) => Ok(columns),
            None => Ok(&self.normalized(table, normalizer)?.column_names),
        }
    }

    /// The clause as compared across trees: normalized text once it has been
    /// computed for this instance, otherwise the raw text.
    pub fn comparable_check_clause(&self) -> &str {
        self.normalized
            .get()
            .map(|n| n.text.as_str())
            .unwrap_or(&self.check_clause)
    }
}
