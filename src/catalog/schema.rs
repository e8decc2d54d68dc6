use super::collection::{Named, NamedMap};
use super::comments::Commentable;
use super::enum_type::EnumType;
use super::function::Function;
use super::id::DbObjectId;
use super::table::Table;
use super::triggers::Trigger;
use super::utils::validate_identifier;
use super::{Provenance, Provenanced, ensure_same_provenance};
use crate::error::{ConsistencyError, Error, ObjectKind, Result};

#[derive(Debug, Clone)]
pub struct Schema {
    provenance: Provenance,
    name: String,
    pub description: Option<String>,
    tables: NamedMap<Table>,
    enums: NamedMap<EnumType>,
    functions: NamedMap<Function>,
}

impl Named for Schema {
    const KIND: ObjectKind = ObjectKind::Schema;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for Schema {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Commentable for Schema {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Schema {
    pub fn new(provenance: Provenance, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier(ObjectKind::Schema, &name)?;
        let owner = Some(DbObjectId::schema(&name));
        Ok(Self {
            provenance,
            description: None,
            tables: NamedMap::new(owner.clone()),
            enums: NamedMap::new(owner.clone()),
            functions: NamedMap::new(owner),
            name,
        })
    }

    pub fn id(&self) -> DbObjectId {
        DbObjectId::schema(&self.name)
    }

    pub fn add_table(&mut self, table: Table) -> Result<&mut Table> {
        ensure_same_provenance(self.provenance, &table)?;
        if table.schema_name() != self.name {
            return Err(Error::validation(
                ObjectKind::Table,
                table.name(),
                format!(
                    "table belongs to schema `{}`, not `{}`",
                    table.schema_name(),
                    self.name
                ),
            ));
        }
        self.tables.insert(table)
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains(name)
    }

    pub fn tables(&self) -> &NamedMap<Table> {
        &self.tables
    }

    pub(crate) fn tables_mut(&mut self) -> &mut NamedMap<Table> {
        &mut self.tables
    }

    pub fn add_enum(&mut self, enum_type: EnumType) -> Result<&mut EnumType> {
        ensure_same_provenance(self.provenance, &enum_type)?;
        self.enums.insert(enum_type)
    }

    pub fn enum_type(&self, name: &str) -> Result<&EnumType> {
        self.enums.get(name)
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    pub fn enums(&self) -> &NamedMap<EnumType> {
        &self.enums
    }

    pub fn add_function(&mut self, function: Function) -> Result<&mut Function> {
        ensure_same_provenance(self.provenance, &function)?;
        self.functions.insert(function)
    }

    pub fn function(&self, name: &str) -> Result<&Function> {
        self.functions.get(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    pub fn functions(&self) -> &NamedMap<Function> {
        &self.functions
    }

    /// Adds `trigger` to `table_name`. The trigger's function must already
    /// be defined in this schema.
    pub fn add_trigger(&mut self, table_name: &str, trigger: Trigger) -> Result<()> {
        ensure_same_provenance(self.provenance, &trigger)?;
        if trigger.function_schema != self.name {
            return Err(ConsistencyError::TriggerFunctionSchema {
                trigger: trigger.name().to_string(),
                table: DbObjectId::table(&self.name, table_name),
                function_schema: trigger.function_schema.clone(),
                function: trigger.function_name.clone(),
            }
            .into());
        }
        self.function(&trigger.function_name)?;
        self.tables.get_mut(table_name)?.insert_trigger(trigger)
    }
}
