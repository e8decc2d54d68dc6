//! Tables and their columns, plus the per-table constraint collections.

use super::collection::{Named, NamedMap};
use super::comments::Commentable;
use super::constraint::{ForeignKeyConstraint, PrimaryKey, UniqueConstraint, Validation};
use super::enum_type::EnumRef;
use super::id::DbObjectId;
use super::index::Index;
use super::normalize::ColumnShape;
use super::triggers::Trigger;
use super::utils::validate_identifier;
use super::{Provenance, Provenanced, ensure_same_provenance};
use crate::error::{Error, ObjectKind, Result};

#[derive(Debug, Clone)]
pub struct Column {
    provenance: Provenance,
    name: String,
    pub data_type: String,
    pub null: bool,
    pub default: Option<String>,
    pub description: Option<String>,
    pub character_maximum_length: Option<i32>,
    pub character_octet_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_precision_radix: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub datetime_precision: Option<i32>,
    pub interval_type: Option<String>,
    enum_ref: Option<EnumRef>,
}

impl Column {
    /// A nullable column without default. Array-ness is read off the `[]`
    /// suffix of `data_type`.
    pub fn new(
        provenance: Provenance,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let data_type = data_type.into();
        validate_identifier(ObjectKind::Column, &name)?;
        if data_type.trim().is_empty() {
            return Err(Error::validation(
                ObjectKind::Column,
                name,
                "data type must not be empty",
            ));
        }
        Ok(Self {
            provenance,
            name,
            data_type,
            null: true,
            default: None,
            description: None,
            character_maximum_length: None,
            character_octet_length: None,
            numeric_precision: None,
            numeric_precision_radix: None,
            numeric_scale: None,
            datetime_precision: None,
            interval_type: None,
            enum_ref: None,
        })
    }

    pub fn is_array(&self) -> bool {
        self.data_type.ends_with("[]")
    }

    /// Attaches the enum this column is typed with. The declared type must be
    /// the enum's qualified name, with `[]` when the column is an array.
    pub fn set_enum(&mut self, enum_ref: EnumRef) -> Result<()> {
        let mut expected = enum_ref.qualified_name();
        if self.is_array() {
            expected.push_str("[]");
        }
        if self.data_type != expected {
            return Err(Error::validation(
                ObjectKind::Column,
                &self.name,
                format!(
                    "data type `{}` does not match enum `{}`",
                    self.data_type,
                    enum_ref.qualified_name()
                ),
            ));
        }
        self.enum_ref = Some(enum_ref);
        Ok(())
    }

    pub fn enum_ref(&self) -> Option<&EnumRef> {
        self.enum_ref.as_ref()
    }

    /// The shape the normalization oracle needs to rebuild this column.
    pub fn shape(&self) -> ColumnShape {
        ColumnShape {
            name: self.name.clone(),
            data_type: self.data_type.clone(),
        }
    }
}

impl Named for Column {
    const KIND: ObjectKind = ObjectKind::Column;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for Column {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Commentable for Column {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    provenance: Provenance,
    schema_name: String,
    name: String,
    pub description: Option<String>,
    columns: NamedMap<Column>,
    primary_key: Option<PrimaryKey>,
    foreign_key_constraints: NamedMap<ForeignKeyConstraint>,
    unique_constraints: NamedMap<UniqueConstraint>,
    validations: NamedMap<Validation>,
    indexes: NamedMap<Index>,
    triggers: NamedMap<Trigger>,
}

impl Named for Table {
    const KIND: ObjectKind = ObjectKind::Table;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for Table {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Commentable for Table {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Table {
    pub fn new(
        provenance: Provenance,
        schema_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let schema_name = schema_name.into();
        let name = name.into();
        validate_identifier(ObjectKind::Schema, &schema_name)?;
        validate_identifier(ObjectKind::Table, &name)?;
        let owner = Some(DbObjectId::table(&schema_name, &name));
        Ok(Self {
            provenance,
            description: None,
            columns: NamedMap::new(owner.clone()),
            primary_key: None,
            foreign_key_constraints: NamedMap::new(owner.clone()),
            unique_constraints: NamedMap::new(owner.clone()),
            validations: NamedMap::new(owner.clone()),
            indexes: NamedMap::new(owner.clone()),
            triggers: NamedMap::new(owner),
            schema_name,
            name,
        })
    }

    pub fn id(&self) -> DbObjectId {
        DbObjectId::table(&self.schema_name, &self.name)
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Fails with a validation error on `object` when one of `columns` is not
    /// a column of this table.
    pub(crate) fn ensure_columns<'a>(
        &self,
        object: ObjectKind,
        name: &str,
        columns: impl IntoIterator<Item = &'a String>,
    ) -> Result<()> {
        match columns.into_iter().find(|column| !self.has_column(column)) {
            Some(column) => Err(Error::validation(
                object,
                name,
                format!(
                    "referenced column `{column}` does not exist on {}.{}",
                    self.schema_name, self.name
                ),
            )),
            None => Ok(()),
        }
    }

    pub fn add_column(&mut self, column: Column) -> Result<&mut Column> {
        ensure_same_provenance(self.provenance, &column)?;
        self.columns.insert(column)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.get(name)
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns.get_mut(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn columns(&self) -> &NamedMap<Column> {
        &self.columns
    }

    pub fn column_shapes(&self) -> Vec<ColumnShape> {
        self.columns.iter().map(Column::shape).collect()
    }

    pub fn set_primary_key(&mut self, primary_key: PrimaryKey) -> Result<()> {
        ensure_same_provenance(self.provenance, &primary_key)?;
        if let Some(existing) = &self.primary_key {
            return Err(Error::AlreadyExists {
                object: ObjectKind::PrimaryKey,
                name: existing.name().to_string(),
                parent: Some(self.id()),
            });
        }
        self.ensure_columns(ObjectKind::PrimaryKey, primary_key.name(), primary_key.column_names())?;
        self.primary_key = Some(primary_key);
        Ok(())
    }

    pub fn primary_key(&self) -> Result<&PrimaryKey> {
        self.primary_key.as_ref().ok_or_else(|| {
            Error::not_found(ObjectKind::PrimaryKey, format!("{}_pkey", self.name), Some(self.id()))
        })
    }

    pub fn has_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }

    /// Optional view of the primary key for tree comparison.
    pub(crate) fn primary_key_entry(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    /// Columns are validated by [`super::Catalog::add_foreign_key_constraint`],
    /// which can see the referenced table.
    pub(crate) fn insert_foreign_key(
        &mut self,
        foreign_key: ForeignKeyConstraint,
    ) -> Result<&mut ForeignKeyConstraint> {
        self.foreign_key_constraints.insert(foreign_key)
    }

    pub fn foreign_key_constraint(&self, name: &str) -> Result<&ForeignKeyConstraint> {
        self.foreign_key_constraints.get(name)
    }

    pub fn has_foreign_key_constraint(&self, name: &str) -> bool {
        self.foreign_key_constraints.contains(name)
    }

    pub fn foreign_key_constraints(&self) -> &NamedMap<ForeignKeyConstraint> {
        &self.foreign_key_constraints
    }

    pub fn add_unique_constraint(
        &mut self,
        unique: UniqueConstraint,
    ) -> Result<&mut UniqueConstraint> {
        ensure_same_provenance(self.provenance, &unique)?;
        self.ensure_columns(ObjectKind::UniqueConstraint, unique.name(), unique.column_names())?;
        self.unique_constraints.insert(unique)
    }

    pub fn unique_constraint(&self, name: &str) -> Result<&UniqueConstraint> {
        self.unique_constraints.get(name)
    }

    pub fn has_unique_constraint(&self, name: &str) -> bool {
        self.unique_constraints.contains(name)
    }

    pub fn unique_constraints(&self) -> &NamedMap<UniqueConstraint> {
        &self.unique_constraints
    }

    /// Explicit validation columns must exist already. Validations without
    /// explicit columns resolve them lazily, see [`Validation::column_names`].
    pub fn add_validation(&mut self, validation: Validation) -> Result<&mut Validation> {
        ensure_same_provenance(self.provenance, &validation)?;
        if let Some(columns) = validation.explicit_column_names() {
            self.ensure_columns(ObjectKind::Validation, validation.name(), columns)?;
        }
        self.validations.insert(validation)
    }

    pub fn validation(&self, name: &str) -> Result<&Validation> {
        self.validations.get(name)
    }

    pub fn has_validation(&self, name: &str) -> bool {
        self.validations.contains(name)
    }

    pub fn validations(&self) -> &NamedMap<Validation> {
        &self.validations
    }

    pub fn add_index(&mut self, index: Index) -> Result<&mut Index> {
        ensure_same_provenance(self.provenance, &index)?;
        self.ensure_columns(ObjectKind::Index, index.name(), index.column_names())?;
        self.ensure_columns(ObjectKind::Index, index.name(), &index.include_column_names)?;
        self.indexes.insert(index)
    }

    pub fn index(&self, name: &str) -> Result<&Index> {
        self.indexes.get(name)
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains(name)
    }

    pub fn indexes(&self) -> &NamedMap<Index> {
        &self.indexes
    }

    /// The function check happens in [`super::schema::Schema::add_trigger`].
    ///
    /// Configured triggers get their `action_order` from their position, by
    /// name, among the table's triggers for the same event.
    pub(crate) fn insert_trigger(&mut self, trigger: Trigger) -> Result<()> {
        ensure_same_provenance(self.provenance, &trigger)?;
        let event = trigger.event_manipulation;
        self.triggers.insert(trigger)?;

        if self.is_configured() {
            let mut order = 0;
            for trigger in self.triggers.iter_mut() {
                if trigger.event_manipulation == event {
                    order += 1;
                    trigger.action_order = order;
                }
            }
        }
        Ok(())
    }

    pub fn trigger(&self, name: &str) -> Result<&Trigger> {
        self.triggers.get(name)
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.contains(name)
    }

    pub fn triggers(&self) -> &NamedMap<Trigger> {
        &self.triggers
    }
}
