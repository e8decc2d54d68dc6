//! Builders for configured and loaded trees without files or a server.

use pgmend::catalog::data_type::infer;
use pgmend::catalog::{Catalog, Database};
use pgmend::config::{ObjectFilter, Objects};
use pgmend::loader::build_loaded_catalog;
use pgmend::loader::structure::{LoadedColumn, LoadedKey, LoadedKeys, LoadedStructure, LoadedTable};
use pgmend::schema_loader::{SchemaDocument, build_configured_catalog};

pub fn configured(documents: &[&str]) -> Catalog {
    configured_with_extensions(documents, &[])
}

pub fn configured_with_extensions(documents: &[&str], extensions: &[&str]) -> Catalog {
    let documents: Vec<SchemaDocument> = documents
        .iter()
        .map(|d| serde_yaml::from_str(d).expect("valid schema document"))
        .collect();
    let extensions = strings(extensions);
    build_configured_catalog(&documents, &extensions, &ObjectFilter::new(&Objects::default()))
        .expect("configured catalog")
}

pub fn loaded(structure: &LoadedStructure) -> Catalog {
    build_loaded_catalog(structure).expect("loaded catalog")
}

pub fn database(documents: &[&str], structure: &LoadedStructure) -> Database {
    Database::new(configured(documents), loaded(structure)).expect("database")
}

/// A column as `information_schema` reports it for `data_type`.
pub fn column(data_type: &str, null: bool) -> LoadedColumn {
    let details = infer(data_type);
    LoadedColumn {
        data_type: data_type.to_string(),
        null,
        character_maximum_length: details.character_maximum_length,
        character_octet_length: details.character_octet_length,
        numeric_precision: details.numeric_precision,
        numeric_precision_radix: details.numeric_precision_radix,
        numeric_scale: details.numeric_scale,
        datetime_precision: details.datetime_precision,
        interval_type: details.interval_type,
        ..Default::default()
    }
}

pub fn add_schema(structure: &mut LoadedStructure, schema: &str) {
    structure.schemas.entry(schema.to_string()).or_default();
}

pub fn add_table(structure: &mut LoadedStructure, schema: &str, table: &str, columns: &[(&str, LoadedColumn)]) {
    structure.schemas.entry(schema.to_string()).or_default().tables.insert(
        table.to_string(),
        LoadedTable {
            description: None,
            columns: columns
                .iter()
                .map(|(name, column)| (name.to_string(), column.clone()))
                .collect(),
        },
    );
}

pub fn add_primary_key(structure: &mut LoadedStructure, schema: &str, table: &str, name: &str, columns: &[&str]) {
    keys(structure, schema, table).primary_key.insert(
        name.to_string(),
        LoadedKey {
            column_names: strings(columns),
            index_type: Some("btree".to_string()),
            ..Default::default()
        },
    );
}

pub fn add_foreign_key(
    structure: &mut LoadedStructure,
    (schema, table, name): (&str, &str, &str),
    columns: &[&str],
    (foreign_schema, foreign_table): (&str, &str),
    foreign_columns: &[&str],
) {
    keys(structure, schema, table).foreign_key.insert(
        name.to_string(),
        LoadedKey {
            column_names: strings(columns),
            foreign_schema: Some(foreign_schema.to_string()),
            foreign_table: Some(foreign_table.to_string()),
            foreign_column_names: strings(foreign_columns),
            ..Default::default()
        },
    );
}

fn keys<'s>(
    structure: &'s mut LoadedStructure,
    schema: &str,
    table: &str,
) -> &'s mut LoadedKeys {
    structure
        .keys
        .entry(schema.to_string())
        .or_default()
        .entry(table.to_string())
        .or_default()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
