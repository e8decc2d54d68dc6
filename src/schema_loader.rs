//! Builds the configured tree from YAML schema files.
//!
//! Each `*.yaml` / `*.yml` file under the schema directory describes one
//! schema:
//!
//! ```yaml
//! name: billing
//! description: Invoicing
//! enums:
//!   invoice_status:
//!     values: [draft, sent, paid]
//! functions:
//!   touch_updated_at:
//!     definition: |
//!       BEGIN NEW.updated_at = now(); RETURN NEW; END;
//! tables:
//!   invoices:
//!     columns:
//!       id: { data_type: integer, null: false }
//!       status: { data_type: billing.invoice_status, null: false }
//!     primary_key: { columns: [id] }
//!     foreign_keys:
//!       invoices_customer_fk:
//!         columns: [customer_id]
//!         foreign_schema: crm
//!         foreign_table: customers
//!         foreign_columns: [id]
//!     triggers:
//!       invoices_touch:
//!         event: update
//!         timing: before
//!         function: touch_updated_at
//! ```

use crate::catalog::constraint::{
    ForeignKeyConstraint, PrimaryKey, ReferentialAction, UniqueConstraint, Validation,
};
use crate::catalog::data_type;
use crate::catalog::enum_type::EnumType;
use crate::catalog::extension::Extension;
use crate::catalog::function::Function;
use crate::catalog::index::{Index, IndexType, NullsPosition, SortOrder};
use crate::catalog::normalize::strip_outer_parens;
use crate::catalog::schema::Schema;
use crate::catalog::table::{Column, Table};
use crate::catalog::triggers::{Trigger, TriggerEvent, TriggerOrientation, TriggerTiming};
use crate::catalog::{Catalog, Provenance};
use crate::config::ObjectFilter;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIGURED: Provenance = Provenance::Configured;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enums: BTreeMap<String, EnumDocument>,
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionDocument>,
    #[serde(default)]
    pub tables: BTreeMap<String, TableDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDocument {
    pub values: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionDocument {
    pub definition: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableDocument {
    pub description: Option<String>,
    pub columns: BTreeMap<String, ColumnDocument>,
    pub primary_key: Option<PrimaryKeyDocument>,
    pub foreign_keys: BTreeMap<String, ForeignKeyDocument>,
    pub unique_constraints: BTreeMap<String, UniqueDocument>,
    pub validations: BTreeMap<String, ValidationDocument>,
    pub indexes: BTreeMap<String, IndexDocument>,
    pub triggers: BTreeMap<String, TriggerDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDocument {
    pub data_type: String,
    #[serde(default = "default_true")]
    pub null: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub character_maximum_length: Option<i32>,
    #[serde(default)]
    pub character_octet_length: Option<i32>,
    #[serde(default)]
    pub numeric_precision: Option<i32>,
    #[serde(default)]
    pub numeric_precision_radix: Option<i32>,
    #[serde(default)]
    pub numeric_scale: Option<i32>,
    #[serde(default)]
    pub datetime_precision: Option<i32>,
    #[serde(default)]
    pub interval_type: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimaryKeyDocument {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
    #[serde(default)]
    pub index_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeyDocument {
    pub columns: Vec<String>,
    #[serde(default)]
    pub foreign_schema: Option<String>,
    pub foreign_table: String,
    pub foreign_columns: Vec<String>,
    #[serde(default)]
    pub deferrable: bool,
    #[serde(default)]
    pub initially_deferred: bool,
    #[serde(default)]
    pub on_update: ReferentialAction,
    #[serde(default)]
    pub on_delete: ReferentialAction,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniqueDocument {
    pub columns: Vec<String>,
    #[serde(default)]
    pub index_type: Option<String>,
    #[serde(default)]
    pub deferrable: bool,
    #[serde(default)]
    pub initially_deferred: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationDocument {
    pub check_clause: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub deferrable: bool,
    #[serde(default)]
    pub initially_deferred: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexDocument {
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, rename = "type")]
    pub index_type: IndexType,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub nulls_position: Option<NullsPosition>,
    #[serde(default, rename = "where")]
    pub where_clause: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerDocument {
    pub event: TriggerEvent,
    pub timing: TriggerTiming,
    #[serde(default)]
    pub orientation: TriggerOrientation,
    pub function: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub old_table: Option<String>,
    #[serde(default)]
    pub new_table: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Configuration for schema loading
#[derive(Debug, Clone)]
pub struct SchemaLoaderConfig {
    pub schema_dir: PathBuf,
    pub extensions: Vec<String>,
}

impl SchemaLoaderConfig {
    pub fn new(schema_dir: PathBuf) -> Self {
        Self {
            schema_dir,
            extensions: Vec::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Handles discovery and parsing of schema files, and builds the configured
/// tree from them
pub struct SchemaLoader {
    config: SchemaLoaderConfig,
}

impl SchemaLoader {
    pub fn new(config: SchemaLoaderConfig) -> Self {
        Self { config }
    }

    /// Load every schema file and build the configured catalog.
    pub fn load_catalog(&self, filter: &ObjectFilter) -> Result<Catalog> {
        let documents = self.load_documents()?;
        let catalog = build_configured_catalog(&documents, &self.config.extensions, filter)?;
        info!(
            "Loaded {} schemas from {}",
            catalog.schemas().len(),
            self.config.schema_dir.display()
        );
        Ok(catalog)
    }

    /// Parse every schema file, in path order.
    pub fn load_documents(&self) -> Result<Vec<SchemaDocument>> {
        let mut documents = Vec::new();
        for path in self.discover_schema_files()? {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let document: SchemaDocument = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse schema file: {}", path.display()))?;
            debug!("Parsed schema {} from {}", document.name, path.display());
            documents.push(document);
        }
        Ok(documents)
    }

    /// Discover all YAML files in the schema directory recursively
    fn discover_schema_files(&self) -> Result<Vec<PathBuf>> {
        let schema_dir = &self.config.schema_dir;
        if !schema_dir.is_dir() {
            return Err(anyhow!(
                "Schema directory not found: {}",
                schema_dir.display()
            ));
        }

        let schema_dir_canonical = fs::canonicalize(schema_dir).with_context(|| {
            format!("Failed to resolve schema directory: {}", schema_dir.display())
        })?;

        let mut files = Vec::new();
        for extension in ["yaml", "yml"] {
            let pattern = schema_dir.join("**").join(format!("*.{extension}"));
            let pattern = pattern.to_string_lossy();
            for entry in glob::glob(&pattern)
                .with_context(|| format!("Invalid schema glob pattern: {pattern}"))?
            {
                let path = entry?;
                // Symlinks must not point outside the schema directory
                if path.is_symlink() {
                    let real_path = fs::canonicalize(&path).with_context(|| {
                        format!("Failed to resolve symlink: {}", path.display())
                    })?;
                    if !real_path.starts_with(&schema_dir_canonical) {
                        return Err(anyhow!(
                            "Symlink points outside schema directory: {} -> {}",
                            path.display(),
                            real_path.display()
                        ));
                    }
                }
                if path.is_file() {
                    files.push(path);
                }
            }
        }

        // Sort alphabetically for deterministic ordering
        files.sort();
        Ok(files)
    }
}

/// Builds the configured tree in two passes: every schema, enum, function,
/// table and table-local object first, then foreign keys, which may point at
/// tables from any file.
pub fn build_configured_catalog(
    documents: &[SchemaDocument],
    extensions: &[String],
    filter: &ObjectFilter,
) -> Result<Catalog> {
    let mut catalog = Catalog::new(CONFIGURED);

    for name in extensions {
        catalog.add_extension(Extension::new(CONFIGURED, name)?)?;
    }

    let documents: Vec<&SchemaDocument> = documents
        .iter()
        .filter(|d| filter.should_include_schema(&d.name))
        .collect();

    for document in &documents {
        let mut schema = Schema::new(CONFIGURED, &document.name)?;
        schema.description = document.description.clone();
        catalog
            .add_schema(schema)
            .with_context(|| format!("Schema {} is defined more than once", document.name))?;
    }

    for document in &documents {
        let schema = catalog.schema_mut(&document.name)?;
        for (name, enum_doc) in &document.enums {
            let mut enum_type = EnumType::new(CONFIGURED, &document.name, name, enum_doc.values.clone())?;
            enum_type.description = enum_doc.description.clone();
            schema.add_enum(enum_type)?;
        }
        for (name, function_doc) in &document.functions {
            let mut function = Function::new(CONFIGURED, name, &function_doc.definition)?;
            function.description = function_doc.description.clone();
            schema.add_function(function)?;
        }
    }

    for document in &documents {
        for (table_name, table_doc) in &document.tables {
            if !filter.should_include_table(&document.name, table_name) {
                debug!("Skipping filtered table {}.{}", document.name, table_name);
                continue;
            }
            let table = build_table(&catalog, &document.name, table_name, table_doc)
                .with_context(|| format!("Invalid table {}.{}", document.name, table_name))?;
            catalog.schema_mut(&document.name)?.add_table(table)?;

            let schema = catalog.schema_mut(&document.name)?;
            for (name, trigger_doc) in &table_doc.triggers {
                schema
                    .add_trigger(table_name, build_trigger(&document.name, name, trigger_doc)?)
                    .with_context(|| {
                        format!("Invalid trigger {name} on {}.{table_name}", document.name)
                    })?;
            }
        }
    }

    for document in &documents {
        for (table_name, table_doc) in &document.tables {
            if !filter.should_include_table(&document.name, table_name) {
                continue;
            }
            for (name, fk_doc) in &table_doc.foreign_keys {
                let mut foreign_key = ForeignKeyConstraint::new(
                    CONFIGURED,
                    name,
                    fk_doc.columns.clone(),
                    fk_doc.foreign_schema.as_deref().unwrap_or(&document.name),
                    &fk_doc.foreign_table,
                    fk_doc.foreign_columns.clone(),
                )?;
                foreign_key.deferrable = fk_doc.deferrable;
                foreign_key.initially_deferred = fk_doc.initially_deferred;
                foreign_key.on_update = fk_doc.on_update;
                foreign_key.on_delete = fk_doc.on_delete;
                foreign_key.description = fk_doc.description.clone();
                catalog
                    .add_foreign_key_constraint(&document.name, table_name, foreign_key)
                    .with_context(|| {
                        format!("Invalid foreign key {name} on {}.{table_name}", document.name)
                    })?;
            }
        }
    }

    Ok(catalog)
}

fn build_table(
    catalog: &Catalog,
    schema_name: &str,
    table_name: &str,
    doc: &TableDocument,
) -> Result<Table> {
    let mut table = Table::new(CONFIGURED, schema_name, table_name)?;
    table.description = doc.description.clone();

    for (name, column_doc) in &doc.columns {
        table.add_column(build_column(catalog, name, column_doc)?)?;
    }

    if let Some(pk_doc) = &doc.primary_key {
        let name = pk_doc
            .name
            .clone()
            .unwrap_or_else(|| format!("{table_name}_pkey"));
        let mut primary_key = PrimaryKey::new(CONFIGURED, name, pk_doc.columns.clone())?;
        if let Some(index_type) = &pk_doc.index_type {
            primary_key.index_type = index_type.clone();
        }
        primary_key.description = pk_doc.description.clone();
        table.set_primary_key(primary_key)?;
    }

    for (name, unique_doc) in &doc.unique_constraints {
        let mut unique = UniqueConstraint::new(CONFIGURED, name, unique_doc.columns.clone())?;
        if let Some(index_type) = &unique_doc.index_type {
            unique.index_type = index_type.clone();
        }
        unique.deferrable = unique_doc.deferrable;
        unique.initially_deferred = unique_doc.initially_deferred;
        unique.description = unique_doc.description.clone();
        table.add_unique_constraint(unique)?;
    }

    for (name, validation_doc) in &doc.validations {
        let mut validation = Validation::new(CONFIGURED, name, &validation_doc.check_clause)?;
        if let Some(columns) = &validation_doc.columns {
            validation.set_column_names(columns.clone())?;
        }
        validation.deferrable = validation_doc.deferrable;
        validation.initially_deferred = validation_doc.initially_deferred;
        validation.description = validation_doc.description.clone();
        table.add_validation(validation)?;
    }

    for (name, index_doc) in &doc.indexes {
        let mut index = Index::new(CONFIGURED, name, index_doc.columns.clone())?;
        index.unique = index_doc.unique;
        index.index_type = index_doc.index_type;
        index.order = index_doc.order;
        index.nulls_position = index_doc
            .nulls_position
            .unwrap_or_else(|| NullsPosition::default_for(index_doc.order));
        index.where_clause = index_doc
            .where_clause
            .as_deref()
            .map(|w| strip_outer_parens(w.trim()).to_string());
        index.include_column_names = index_doc.include.clone();
        index.description = index_doc.description.clone();
        table.add_index(index)?;
    }

    Ok(table)
}

/// The data type is stored in `format_type()` spelling. Precision fields not
/// spelled out in YAML are derived from it the way `information_schema`
/// reports them. A type naming one of the configured enums attaches that enum.
fn build_column(catalog: &Catalog, name: &str, doc: &ColumnDocument) -> Result<Column> {
    let type_name = data_type::canonical(&doc.data_type);
    let mut column = Column::new(CONFIGURED, name, &type_name)?;
    column.null = doc.null;
    column.default = doc.default.clone();
    column.description = doc.description.clone();

    let inferred = data_type::infer(&type_name);
    column.character_maximum_length = doc
        .character_maximum_length
        .or(inferred.character_maximum_length);
    column.character_octet_length = doc.character_octet_length.or(inferred.character_octet_length);
    column.numeric_precision = doc.numeric_precision.or(inferred.numeric_precision);
    column.numeric_precision_radix = doc
        .numeric_precision_radix
        .or(inferred.numeric_precision_radix);
    column.numeric_scale = doc.numeric_scale.or(inferred.numeric_scale);
    column.datetime_precision = doc.datetime_precision.or(inferred.datetime_precision);
    column.interval_type = doc.interval_type.clone().or(inferred.interval_type);

    let base_type = type_name.strip_suffix("[]").unwrap_or(&type_name);
    if let Some((schema_name, enum_name)) = base_type.split_once('.')
        && let Ok(schema) = catalog.schema(schema_name)
        && let Ok(enum_type) = schema.enum_type(enum_name)
    {
        column.set_enum(enum_type.enum_ref())?;
    }
    Ok(column)
}

fn build_trigger(schema_name: &str, name: &str, doc: &TriggerDocument) -> Result<Trigger> {
    // `schema.function` names a function elsewhere, which add_trigger rejects
    let (function_schema, function_name) = doc
        .function
        .split_once('.')
        .unwrap_or((schema_name, doc.function.as_str()));
    let mut trigger = Trigger::new(
        CONFIGURED,
        name,
        doc.event,
        doc.timing,
        function_schema,
        function_name,
    )?;
    trigger.action_orientation = doc.orientation;
    trigger.action_condition = doc.condition.clone();
    trigger.parameters = doc.parameters.clone();
    trigger.action_reference_old_table = doc.old_table.clone();
    trigger.action_reference_new_table = doc.new_table.clone();
    trigger.description = doc.description.clone();
    Ok(trigger)
}

/// Loads the configured catalog from `schema_dir`.
pub fn load_configured_catalog(
    schema_dir: &Path,
    extensions: &[String],
    filter: &ObjectFilter,
) -> Result<Catalog> {
    SchemaLoader::new(SchemaLoaderConfig::new(schema_dir.to_path_buf()).with_extensions(extensions.to_vec()))
        .load_catalog(filter)
}
