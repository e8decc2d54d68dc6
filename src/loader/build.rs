use super::structure::{LoadedColumn, LoadedIndex, LoadedKey, LoadedStructure, LoadedTrigger};
use crate::catalog::constraint::{ForeignKeyConstraint, PrimaryKey, UniqueConstraint, Validation};
use crate::catalog::enum_type::{EnumRef, EnumType};
use crate::catalog::extension::Extension;
use crate::catalog::function::Function;
use crate::catalog::index::{Index, NullsPosition};
use crate::catalog::schema::Schema;
use crate::catalog::table::{Column, Table};
use crate::catalog::triggers::Trigger;
use crate::catalog::{Catalog, Provenance};
use crate::error::{Error, ObjectKind, Result};
use tracing::{debug, info};

const LOADED: Provenance = Provenance::Loaded;

/// Builds the loaded tree from introspected data.
///
/// Objects are added parents first; foreign keys go last since their targets
/// may be any table in any schema.
pub fn build_loaded_catalog(structure: &LoadedStructure) -> Result<Catalog> {
    let mut catalog = Catalog::new(LOADED);

    for name in &structure.extensions {
        catalog.add_extension(Extension::new(LOADED, name)?)?;
    }

    for (schema_name, loaded) in &structure.schemas {
        let mut schema = Schema::new(LOADED, schema_name)?;
        schema.description = loaded.description.clone();
        catalog.add_schema(schema)?;
    }

    for (schema_name, enums) in &structure.enums {
        let schema = catalog.schema_mut(schema_name)?;
        for (name, loaded) in enums {
            let mut enum_type = EnumType::new(LOADED, schema_name, name, loaded.values.clone())?;
            enum_type.description = loaded.description.clone();
            schema.add_enum(enum_type)?;
        }
    }

    for (schema_name, functions) in &structure.functions {
        let schema = catalog.schema_mut(schema_name)?;
        for (name, loaded) in functions {
            let mut function = Function::new(LOADED, name, &loaded.definition)?;
            function.description = loaded.description.clone();
            schema.add_function(function)?;
        }
    }

    for (schema_name, loaded_schema) in &structure.schemas {
        for (table_name, loaded_table) in &loaded_schema.tables {
            let mut table = Table::new(LOADED, schema_name, table_name)?;
            table.description = loaded_table.description.clone();
            for (column_name, loaded_column) in &loaded_table.columns {
                let column = build_column(&catalog, column_name, loaded_column)?;
                table.add_column(column)?;
            }
            catalog.schema_mut(schema_name)?.add_table(table)?;
        }
    }

    for (schema_name, tables) in &structure.keys {
        for (table_name, keys) in tables {
            let table = catalog.schema_mut(schema_name)?.table_mut(table_name)?;
            for (name, key) in &keys.primary_key {
                let mut primary_key = PrimaryKey::new(LOADED, name, key.column_names.clone())?;
                primary_key.description = key.description.clone();
                if let Some(index_type) = &key.index_type {
                    primary_key.index_type = index_type.clone();
                }
                table.set_primary_key(primary_key)?;
            }
            for (name, key) in &keys.unique {
                let mut unique = UniqueConstraint::new(LOADED, name, key.column_names.clone())?;
                unique.deferrable = key.deferrable;
                unique.initially_deferred = key.initially_deferred;
                unique.description = key.description.clone();
                if let Some(index_type) = &key.index_type {
                    unique.index_type = index_type.clone();
                }
                table.add_unique_constraint(unique)?;
            }
        }
    }

    for (schema_name, tables) in &structure.indexes {
        for (table_name, indexes) in tables {
            let table = catalog.schema_mut(schema_name)?.table_mut(table_name)?;
            for (name, loaded) in indexes {
                table.add_index(build_index(name, loaded)?)?;
            }
        }
    }

    for (schema_name, tables) in &structure.validations {
        for (table_name, validations) in tables {
            let table = catalog.schema_mut(schema_name)?.table_mut(table_name)?;
            for (name, loaded) in validations {
                let mut validation = Validation::new(LOADED, name, &loaded.check_clause)?;
                if !loaded.column_names.is_empty() {
                    validation.set_column_names(loaded.column_names.clone())?;
                }
                validation.deferrable = loaded.deferrable;
                validation.initially_deferred = loaded.initially_deferred;
                validation.description = loaded.description.clone();
                table.add_validation(validation)?;
            }
        }
    }

    for (schema_name, tables) in &structure.triggers {
        for (table_name, triggers) in tables {
            for (name, loaded) in triggers {
                add_trigger(&mut catalog, schema_name, table_name, name, loaded)?;
            }
        }
    }

    for (schema_name, tables) in &structure.keys {
        for (table_name, keys) in tables {
            for (name, key) in &keys.foreign_key {
                let foreign_key = build_foreign_key(schema_name, name, key)?;
                catalog.add_foreign_key_constraint(schema_name, table_name, foreign_key)?;
            }
        }
    }

    info!(
        "Built loaded catalog with {} schemas",
        catalog.schemas().len()
    );
    Ok(catalog)
}

fn build_column(catalog: &Catalog, name: &str, loaded: &LoadedColumn) -> Result<Column> {
    let mut column = Column::new(LOADED, name, &loaded.data_type)?;
    column.null = loaded.null;
    column.default = loaded.default.clone();
    column.description = loaded.description.clone();
    column.character_maximum_length = loaded.character_maximum_length;
    column.character_octet_length = loaded.character_octet_length;
    column.numeric_precision = loaded.numeric_precision;
    column.numeric_precision_radix = loaded.numeric_precision_radix;
    column.numeric_scale = loaded.numeric_scale;
    column.datetime_precision = loaded.datetime_precision;
    column.interval_type = loaded.interval_type.clone();

    if loaded.is_enum {
        let enum_ref = parse_enum_ref(name, &loaded.data_type)?;
        catalog
            .schema(&enum_ref.schema)?
            .enum_type(&enum_ref.name)?;
        column.set_enum(enum_ref)?;
    }
    Ok(column)
}

/// Splits a qualified `schema.enum` type (optionally `[]`-suffixed).
pub(crate) fn parse_enum_ref(column: &str, data_type: &str) -> Result<EnumRef> {
    let base = data_type.strip_suffix("[]").unwrap_or(data_type);
    match base.split_once('.') {
        Some((schema, name)) if !schema.is_empty() && !name.is_empty() => {
            Ok(EnumRef::new(schema, name))
        }
        _ => Err(Error::validation(
            ObjectKind::Column,
            column,
            format!("enum column type `{data_type}` is not schema-qualified"),
        )),
    }
}

fn build_index(name: &str, loaded: &LoadedIndex) -> Result<Index> {
    let mut index = Index::new(LOADED, name, loaded.column_names.clone())?;
    index.unique = loaded.unique;
    index.index_type = loaded.index_type;
    index.order = loaded.order;
    index.nulls_position = loaded
        .nulls_position
        .unwrap_or_else(|| NullsPosition::default_for(loaded.order));
    index.where_clause = loaded.where_clause.clone();
    index.include_column_names = loaded.include_column_names.clone();
    index.description = loaded.description.clone();
    Ok(index)
}

fn add_trigger(
    catalog: &mut Catalog,
    schema_name: &str,
    table_name: &str,
    name: &str,
    loaded: &LoadedTrigger,
) -> Result<()> {
    let function_schema = catalog.schema_mut(&loaded.function.schema)?;
    if !function_schema.has_function(&loaded.function.name) {
        debug!(
            "Adding trigger function {}.{}",
            loaded.function.schema, loaded.function.name
        );
        let mut function = Function::new(LOADED, &loaded.function.name, &loaded.function.definition)?;
        function.description = loaded.function.description.clone();
        function_schema.add_function(function)?;
    }

    let mut trigger = Trigger::new(
        LOADED,
        name,
        loaded.event_manipulation,
        loaded.action_timing,
        &loaded.function.schema,
        &loaded.function.name,
    )?;
    trigger.action_orientation = loaded.action_orientation;
    trigger.action_condition = loaded.action_condition.clone();
    trigger.parameters = loaded.parameters.clone();
    trigger.action_reference_old_table = loaded.action_reference_old_table.clone();
    trigger.action_reference_new_table = loaded.action_reference_new_table.clone();
    trigger.action_order = loaded.action_order;
    trigger.description = loaded.description.clone();

    catalog.schema_mut(schema_name)?.add_trigger(table_name, trigger)
}

fn build_foreign_key(schema_name: &str, name: &str, key: &LoadedKey) -> Result<ForeignKeyConstraint> {
    let foreign_table = key.foreign_table.clone().ok_or_else(|| {
        Error::validation(ObjectKind::ForeignKey, name, "foreign table is missing")
    })?;
    let mut foreign_key = ForeignKeyConstraint::new(
        LOADED,
        name,
        key.column_names.clone(),
        key.foreign_schema.as_deref().unwrap_or(schema_name),
        foreign_table,
        key.foreign_column_names.clone(),
    )?;
    foreign_key.deferrable = key.deferrable;
    foreign_key.initially_deferred = key.initially_deferred;
    foreign_key.on_update = key.on_update;
    foreign_key.on_delete = key.on_delete;
    foreign_key.description = key.description.clone();
    Ok(foreign_key)
}
