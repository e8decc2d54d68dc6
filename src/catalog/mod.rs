//! Typed entity model for both sides of a comparison.
//!
//! A [`Database`] holds two independent [`Catalog`] trees: the one built from
//! YAML configuration and the one built from introspection. Every entity is
//! tagged with the [`Provenance`] of the tree it belongs to, and the `add_*`
//! operations refuse to mix the two.

use crate::catalog::constraint::ForeignKeyConstraint;
use crate::catalog::id::DbObjectId;
use crate::error::{ConsistencyError, Error, ObjectKind, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod collection;
pub mod comments;
pub mod constraint;
pub mod data_type;
pub mod enum_type;
pub mod extension;
pub mod function;
pub mod id;
pub mod index;
pub mod normalize;
pub mod schema;
pub mod table;
pub mod triggers;
pub mod utils;

use collection::{Named, NamedMap};
use extension::Extension;
use schema::Schema;

/// Which tree an entity was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Built from the desired-state YAML configuration.
    Configured,
    /// Built from database introspection.
    Loaded,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Configured => "configured",
            Provenance::Loaded => "loaded",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Provenanced {
    fn provenance(&self) -> Provenance;

    fn is_configured(&self) -> bool {
        self.provenance() == Provenance::Configured
    }

    fn is_loaded(&self) -> bool {
        self.provenance() == Provenance::Loaded
    }
}

/// Fails with [`ConsistencyError::MixedProvenance`] unless `child` was built
/// for the same tree as its parent.
pub(crate) fn ensure_same_provenance<T: Named + Provenanced>(
    parent: Provenance,
    child: &T,
) -> Result<()> {
    if parent == child.provenance() {
        return Ok(());
    }
    Err(ConsistencyError::MixedProvenance {
        object: T::KIND,
        name: child.name().to_string(),
        parent: parent.as_str(),
        child: child.provenance().as_str(),
    }
    .into())
}

/// One side of the comparison: schemas plus database-level extensions.
#[derive(Debug, Clone)]
pub struct Catalog {
    provenance: Provenance,
    schemas: NamedMap<Schema>,
    extensions: NamedMap<Extension>,
}

impl Provenanced for Catalog {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Catalog {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            schemas: NamedMap::new(None),
            extensions: NamedMap::new(None),
        }
    }

    pub fn add_schema(&mut self, schema: Schema) -> Result<&mut Schema> {
        ensure_same_provenance(self.provenance, &schema)?;
        self.schemas.insert(schema)
    }

    pub fn schema(&self, name: &str) -> Result<&Schema> {
        self.schemas.get(name)
    }

    pub fn schema_mut(&mut self, name: &str) -> Result<&mut Schema> {
        self.schemas.get_mut(name)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains(name)
    }

    pub fn schemas(&self) -> &NamedMap<Schema> {
        &self.schemas
    }

    pub(crate) fn schemas_mut(&mut self) -> &mut NamedMap<Schema> {
        &mut self.schemas
    }

    pub fn add_extension(&mut self, extension: Extension) -> Result<&mut Extension> {
        ensure_same_provenance(self.provenance, &extension)?;
        self.extensions.insert(extension)
    }

    pub fn extension(&self, name: &str) -> Result<&Extension> {
        self.extensions.get(name)
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }

    pub fn extensions(&self) -> &NamedMap<Extension> {
        &self.extensions
    }

    /// Adds a foreign key to `schema_name.table_name`.
    ///
    /// Lives on the catalog because the referenced table may sit in another
    /// schema: the local columns must exist on the owning table and the
    /// foreign columns on the referenced one. A table may reference itself,
    /// but not through the identical column set.
    pub fn add_foreign_key_constraint(
        &mut self,
        schema_name: &str,
        table_name: &str,
        foreign_key: ForeignKeyConstraint,
    ) -> Result<()> {
        ensure_same_provenance(self.provenance, &foreign_key)?;

        let name = foreign_key.name().to_string();
        let table = self.schema(schema_name)?.table(table_name)?;
        table.ensure_columns(ObjectKind::ForeignKey, &name, foreign_key.column_names())?;

        let foreign_table = self
            .schema(&foreign_key.foreign_schema)?
            .table(&foreign_key.foreign_table)?;
        foreign_table.ensure_columns(
            ObjectKind::ForeignKey,
            &name,
            foreign_key.foreign_column_names(),
        )?;

        let self_reference =
            foreign_key.foreign_schema == schema_name && foreign_key.foreign_table == table_name;
        if self_reference && foreign_key.column_names() == foreign_key.foreign_column_names() {
            return Err(Error::validation(
                ObjectKind::ForeignKey,
                name,
                "a self-referencing foreign key cannot use the same columns on both sides",
            ));
        }

        self.schema_mut(schema_name)?
            .table_mut(table_name)?
            .insert_foreign_key(foreign_key)?;
        Ok(())
    }

    /// Every foreign key in the tree whose target is `target`.
    pub fn foreign_keys_referencing<'a>(
        &'a self,
        target: &'a DbObjectId,
    ) -> impl Iterator<Item = (&'a table::Table, &'a ForeignKeyConstraint)> + 'a {
        self.schemas.iter().flat_map(move |schema| {
            schema.tables().iter().flat_map(move |table| {
                table.foreign_key_constraints().iter().filter_map(move |fk| {
                    let hit = matches!(
                        target,
                        DbObjectId::Table { schema, name }
                            if *schema == fk.foreign_schema && *name == fk.foreign_table
                    );
                    hit.then_some((table, fk))
                })
            })
        })
    }
}

/// Root of a comparison: the configured and loaded trees, never merged.
#[derive(Debug, Clone)]
pub struct Database {
    configured: Catalog,
    loaded: Catalog,
}

impl Database {
    pub fn new(configured: Catalog, loaded: Catalog) -> Result<Self> {
        for (expected, catalog) in [
            (Provenance::Configured, &configured),
            (Provenance::Loaded, &loaded),
        ] {
            if catalog.provenance() != expected {
                return Err(ConsistencyError::MixedProvenance {
                    object: ObjectKind::Schema,
                    name: "<catalog>".to_string(),
                    parent: expected.as_str(),
                    child: catalog.provenance().as_str(),
                }
                .into());
            }
        }
        Ok(Self { configured, loaded })
    }

    pub fn configured(&self) -> &Catalog {
        &self.configured
    }

    pub fn loaded(&self) -> &Catalog {
        &self.loaded
    }

    pub fn catalog(&self, provenance: Provenance) -> &Catalog {
        match provenance {
            Provenance::Configured => &self.configured,
            Provenance::Loaded => &self.loaded,
        }
    }
}
