use crate::catalog::id::TableRef;
use crate::error::{ConsistencyError, Result};
use crate::plan::fragment::{ChangeKind, Fragment, Phase, UnitScope};
use serde::Serialize;
use std::collections::BTreeSet;

/// A named, ordered group of fragments for one database, schema or table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationUnit {
    scope: UnitScope,
    schema_name: Option<String>,
    table_name: Option<String>,
    /// Holds only foreign keys pulled out of another unit to break a cycle.
    deferred: bool,
    /// Assigned when the unit is emitted.
    pub name: String,
    fragments: Vec<Fragment>,
}

impl MigrationUnit {
    pub fn new(scope: UnitScope, schema_name: Option<String>, table_name: Option<String>) -> Self {
        Self {
            scope,
            schema_name,
            table_name,
            deferred: false,
            name: String::new(),
            fragments: Vec::new(),
        }
    }

    pub fn for_database() -> Self {
        Self::new(UnitScope::Database, None, None)
    }

    pub fn for_schema(schema_name: impl Into<String>) -> Self {
        Self::new(UnitScope::Schema, Some(schema_name.into()), None)
    }

    pub fn for_table(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self::new(
            UnitScope::Table,
            Some(schema_name.into()),
            Some(table_name.into()),
        )
    }

    /// Unit holding foreign keys that could not stay in their table's unit.
    pub fn deferred(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            deferred: true,
            ..Self::for_table(schema_name, table_name)
        }
    }

    pub fn scope(&self) -> UnitScope {
        self.scope
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Change kinds a unit of `scope` accepts.
    pub fn supports(scope: UnitScope, kind: ChangeKind) -> bool {
        kind.scope() == scope
    }

    /// What the unit is about, e.g. `billing.invoices table`.
    pub fn subject(&self) -> String {
        let schema = self.schema_name.as_deref().unwrap_or_default();
        match self.scope {
            UnitScope::Database => "extensions".to_string(),
            UnitScope::Schema => {
                let objects = self
                    .fragments
                    .first()
                    .is_some_and(|f| f.change_kind.is_schema_object());
                if objects {
                    format!("{schema} schema objects")
                } else {
                    format!("{schema} schema")
                }
            }
            UnitScope::Table => {
                let table = self.table_name.as_deref().unwrap_or_default();
                format!("{schema}.{table} table")
            }
        }
    }

    /// Name derived from the unit's location and its first fragment, before
    /// run-wide de-duplication.
    pub fn base_name(&self) -> Result<String> {
        let first = self.fragments.first().ok_or_else(|| ConsistencyError::NoFragments {
            unit: self.subject(),
        })?;
        if self.deferred {
            let schema = self.schema_name.as_deref().unwrap_or_default();
            let table = self.table_name.as_deref().unwrap_or_default();
            return Ok(format!("add foreign keys to {schema}.{table}"));
        }
        Ok(format!("{} {}", first.change_kind.unit_verb(), self.subject()))
    }

    /// Phase of the unit's first fragment.
    pub fn phase(&self) -> Option<Phase> {
        self.fragments.first().map(|f| f.change_kind.phase())
    }

    pub fn add_fragment(&mut self, fragment: Fragment) -> Result<()> {
        if fragment.schema_name != self.schema_name {
            return Err(ConsistencyError::UnexpectedSchema {
                unit: self.subject(),
                expected: describe_schema(self.schema_name.as_deref()),
                found: describe_schema(fragment.schema_name.as_deref()),
            }
            .into());
        }
        if !Self::supports(self.scope, fragment.change_kind) {
            return Err(ConsistencyError::UnexpectedMigrationMethodName {
                unit: self.subject(),
                kind: fragment.change_kind.to_string(),
            }
            .into());
        }
        self.fragments.push(fragment);
        Ok(())
    }

    /// Tables the unit's fragments need to exist, de-duplicated and sorted.
    pub fn table_dependencies(&self) -> Result<BTreeSet<TableRef>> {
        if self.fragments.is_empty() {
            return Err(ConsistencyError::NoFragments {
                unit: self.subject(),
            }
            .into());
        }
        Ok(self
            .fragments
            .iter()
            .filter_map(|f| f.dependency.clone())
            .collect())
    }

    pub fn dependency_count(&self, schema_name: &str, table_name: &str) -> usize {
        self.fragments
            .iter()
            .filter(|f| f.depends_on(schema_name, table_name))
            .count()
    }

    /// Removes and returns the fragments depending on `schema_name.table_name`,
    /// keeping the relative order of both the extracted and the remaining
    /// fragments.
    pub fn extract_fragments_with_dependency(
        &mut self,
        schema_name: &str,
        table_name: &str,
    ) -> Vec<Fragment> {
        let (extracted, kept): (Vec<Fragment>, Vec<Fragment>) = std::mem::take(&mut self.fragments)
            .into_iter()
            .partition(|f| f.depends_on(schema_name, table_name));
        self.fragments = kept;
        extracted
    }

    /// Tables created by this unit.
    pub fn created_tables(&self) -> impl Iterator<Item = TableRef> + '_ {
        self.fragments.iter().filter_map(Fragment::created_table)
    }
}

fn describe_schema(schema_name: Option<&str>) -> String {
    schema_name.unwrap_or("<database>").to_string()
}
