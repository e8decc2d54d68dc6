//! Reads the current database structure from `pg_catalog` and
//! `information_schema` into a [`LoadedStructure`].
//!
//! System schemas and objects owned by extensions are skipped. Every query
//! casts `name` and domain-typed columns to plain SQL types so rows decode
//! into ordinary Rust strings and integers.

use crate::catalog::constraint::ReferentialAction;
use crate::catalog::index::{IndexType, NullsPosition, SortOrder};
use crate::catalog::normalize::strip_outer_parens;
use crate::catalog::triggers::{TriggerEvent, TriggerOrientation, TriggerTiming};
use crate::catalog::utils::is_system_schema;
use crate::loader::structure::{
    LoadedColumn, LoadedEnum, LoadedFunction, LoadedFunctionBody, LoadedIndex, LoadedKey,
    LoadedSchema, LoadedStructure, LoadedTable, LoadedTrigger, LoadedValidation,
};
use anyhow::{Context, Result, anyhow};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

/// Namespace filter shared by every query; `n` is the owning `pg_namespace`.
const USER_NAMESPACE: &str = "n.nspname NOT IN ('pg_catalog', 'information_schema', 'pg_toast') \
     AND n.nspname NOT LIKE 'pg\\_temp\\_%' \
     AND n.nspname NOT LIKE 'pg\\_toast\\_temp\\_%'";

/// Introspects everything the loaded tree models.
pub async fn introspect(pool: &PgPool) -> Result<LoadedStructure> {
    let mut structure = LoadedStructure {
        extensions: fetch_extensions(pool).await?,
        ..LoadedStructure::default()
    };

    for row in fetch_schemas(pool).await? {
        structure.schemas.insert(
            row.name,
            LoadedSchema {
                description: row.description,
                ..LoadedSchema::default()
            },
        );
    }

    for row in fetch_tables(pool).await? {
        if let Some(schema) = structure.schemas.get_mut(&row.schema_name) {
            schema.tables.insert(
                row.table_name,
                LoadedTable {
                    description: row.description,
                    ..LoadedTable::default()
                },
            );
        }
    }

    for row in fetch_columns(pool).await? {
        let Some(table) = structure
            .schemas
            .get_mut(&row.schema_name)
            .and_then(|s| s.tables.get_mut(&row.table_name))
        else {
            continue;
        };
        table.columns.insert(row.column_name.clone(), row.into_column());
    }

    for row in fetch_enums(pool).await? {
        structure.enums.entry(row.schema_name).or_default().insert(
            row.enum_name,
            LoadedEnum {
                values: row.labels,
                description: row.description,
            },
        );
    }

    for row in fetch_trigger_functions(pool).await? {
        structure.functions.entry(row.schema_name).or_default().insert(
            row.function_name,
            LoadedFunctionBody {
                definition: row.definition,
                description: row.description,
            },
        );
    }

    for row in fetch_keys(pool).await? {
        let keys = structure
            .keys
            .entry(row.schema_name.clone())
            .or_default()
            .entry(row.table_name.clone())
            .or_default();
        let group = match row.kind.as_str() {
            "p" => &mut keys.primary_key,
            "f" => &mut keys.foreign_key,
            "u" => &mut keys.unique,
            other => return Err(anyhow!("unexpected constraint type `{other}`")),
        };
        group.insert(row.constraint_name.clone(), row.into_key()?);
    }

    for row in fetch_validations(pool).await? {
        structure
            .validations
            .entry(row.schema_name.clone())
            .or_default()
            .entry(row.table_name.clone())
            .or_default()
            .insert(
                row.constraint_name.clone(),
                LoadedValidation {
                    column_names: row.column_names,
                    check_clause: row.check_clause,
                    description: row.description,
                    deferrable: row.deferrable,
                    initially_deferred: row.initially_deferred,
                },
            );
    }

    for row in fetch_indexes(pool).await? {
        structure
            .indexes
            .entry(row.schema_name.clone())
            .or_default()
            .entry(row.table_name.clone())
            .or_default()
            .insert(row.index_name.clone(), row.into_index()?);
    }

    for row in fetch_triggers(pool).await? {
        structure
            .triggers
            .entry(row.schema_name.clone())
            .or_default()
            .entry(row.table_name.clone())
            .or_default()
            .insert(row.trigger_name.clone(), row.into_trigger()?);
    }

    info!(
        "Introspected {} schemas, {} extensions",
        structure.schemas.len(),
        structure.extensions.len()
    );
    Ok(structure)
}

#[derive(Debug, FromRow)]
struct SchemaRow {
    name: String,
    description: Option<String>,
}

async fn fetch_schemas(pool: &PgPool) -> Result<Vec<SchemaRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS name,
               obj_description(n.oid, 'pg_namespace') AS description
        FROM pg_namespace n
        WHERE {USER_NAMESPACE}
          AND NOT EXISTS (
              SELECT 1 FROM pg_depend d
              WHERE d.classid = 'pg_namespace'::regclass AND d.objid = n.oid AND d.deptype = 'e'
          )
        ORDER BY n.nspname
        "#
    );
    let rows: Vec<SchemaRow> = sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch schemas")?;
    Ok(rows
        .into_iter()
        .filter(|row| !is_system_schema(&row.name))
        .collect())
}

async fn fetch_extensions(pool: &PgPool) -> Result<Vec<String>> {
    // plpgsql ships with every database and is never managed here.
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT extname::text FROM pg_extension WHERE extname <> 'plpgsql' ORDER BY extname",
    )
    .fetch_all(pool)
    .await
    .context("Failed to fetch extensions")?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[derive(Debug, FromRow)]
struct TableRow {
    schema_name: String,
    table_name: String,
    description: Option<String>,
}

async fn fetch_tables(pool: &PgPool) -> Result<Vec<TableRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS schema_name,
               c.relname::text AS table_name,
               obj_description(c.oid, 'pg_class') AS description
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relkind IN ('r', 'p')
          AND NOT c.relispartition
          AND {USER_NAMESPACE}
          AND NOT EXISTS (
              SELECT 1 FROM pg_depend d
              WHERE d.classid = 'pg_class'::regclass AND d.objid = c.oid AND d.deptype = 'e'
          )
        ORDER BY 1, 2
        "#
    );
    sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch tables")
}

#[derive(Debug, FromRow)]
struct ColumnRow {
    schema_name: String,
    table_name: String,
    column_name: String,
    data_type: String,
    is_nullable: bool,
    column_default: Option<String>,
    description: Option<String>,
    character_maximum_length: Option<i32>,
    character_octet_length: Option<i32>,
    numeric_precision: Option<i32>,
    numeric_precision_radix: Option<i32>,
    numeric_scale: Option<i32>,
    datetime_precision: Option<i32>,
    interval_type: Option<String>,
    is_enum: bool,
    is_array: bool,
}

impl ColumnRow {
    fn into_column(self) -> LoadedColumn {
        LoadedColumn {
            data_type: self.data_type,
            null: self.is_nullable,
            default: self.column_default,
            description: self.description,
            character_maximum_length: self.character_maximum_length,
            character_octet_length: self.character_octet_length,
            numeric_precision: self.numeric_precision,
            numeric_precision_radix: self.numeric_precision_radix,
            numeric_scale: self.numeric_scale,
            datetime_precision: self.datetime_precision,
            interval_type: self.interval_type,
            is_enum: self.is_enum,
            is_array: self.is_array,
        }
    }
}

/// Enum-typed columns report `schema.enum` (plus `[]` for arrays) so they
/// can be tied back to the enum; everything else uses `format_type()`.
async fn fetch_columns(pool: &PgPool) -> Result<Vec<ColumnRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS schema_name,
               c.relname::text AS table_name,
               a.attname::text AS column_name,
               CASE
                   WHEN t.typtype = 'e' THEN tn.nspname || '.' || t.typname
                   WHEN et.typtype = 'e' THEN etn.nspname || '.' || et.typname || '[]'
                   ELSE format_type(a.atttypid, a.atttypmod)
               END AS data_type,
               NOT a.attnotnull AS is_nullable,
               isc.column_default::text AS column_default,
               col_description(c.oid, a.attnum) AS description,
               isc.character_maximum_length::int4 AS character_maximum_length,
               isc.character_octet_length::int4 AS character_octet_length,
               isc.numeric_precision::int4 AS numeric_precision,
               isc.numeric_precision_radix::int4 AS numeric_precision_radix,
               isc.numeric_scale::int4 AS numeric_scale,
               isc.datetime_precision::int4 AS datetime_precision,
               isc.interval_type::text AS interval_type,
               (t.typtype = 'e' OR COALESCE(et.typtype = 'e', false)) AS is_enum,
               t.typcategory = 'A' AS is_array
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_type t ON t.oid = a.atttypid
        JOIN pg_namespace tn ON tn.oid = t.typnamespace
        LEFT JOIN pg_type et ON et.oid = t.typelem AND t.typcategory = 'A'
        LEFT JOIN pg_namespace etn ON etn.oid = et.typnamespace
        JOIN information_schema.columns isc
          ON isc.table_schema = n.nspname
         AND isc.table_name = c.relname
         AND isc.column_name = a.attname
        WHERE c.relkind IN ('r', 'p')
          AND a.attnum > 0
          AND NOT a.attisdropped
          AND {USER_NAMESPACE}
        ORDER BY 1, 2, a.attnum
        "#
    );
    sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch columns")
}

#[derive(Debug, FromRow)]
struct EnumRow {
    schema_name: String,
    enum_name: String,
    labels: Vec<String>,
    description: Option<String>,
}

async fn fetch_enums(pool: &PgPool) -> Result<Vec<EnumRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS schema_name,
               t.typname::text AS enum_name,
               array_agg(e.enumlabel::text ORDER BY e.enumsortorder) AS labels,
               obj_description(t.oid, 'pg_type') AS description
        FROM pg_type t
        JOIN pg_enum e ON e.enumtypid = t.oid
        JOIN pg_namespace n ON n.oid = t.typnamespace
        WHERE {USER_NAMESPACE}
          AND NOT EXISTS (
              SELECT 1 FROM pg_depend d
              WHERE d.classid = 'pg_type'::regclass AND d.objid = t.oid AND d.deptype = 'e'
          )
        GROUP BY n.nspname, t.typname, t.oid
        ORDER BY 1, 2
        "#
    );
    sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch enums")
}

#[derive(Debug, FromRow)]
struct FunctionRow {
    schema_name: String,
    function_name: String,
    definition: String,
    description: Option<String>,
}

/// Argument-less functions returning `trigger`, the only kind modeled.
async fn fetch_trigger_functions(pool: &PgPool) -> Result<Vec<FunctionRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS schema_name,
               p.proname::text AS function_name,
               p.prosrc AS definition,
               obj_description(p.oid, 'pg_proc') AS description
        FROM pg_proc p
        JOIN pg_namespace n ON n.oid = p.pronamespace
        WHERE p.prorettype = 'trigger'::regtype
          AND p.pronargs = 0
          AND {USER_NAMESPACE}
          AND NOT EXISTS (
              SELECT 1 FROM pg_depend d
              WHERE d.classid = 'pg_proc'::regclass AND d.objid = p.oid AND d.deptype = 'e'
          )
        ORDER BY 1, 2
        "#
    );
    sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch trigger functions")
}

#[derive(Debug, FromRow)]
struct KeyRow {
    schema_name: String,
    table_name: String,
    constraint_name: String,
    kind: String,
    column_names: Vec<String>,
    foreign_schema: Option<String>,
    foreign_table: Option<String>,
    foreign_column_names: Vec<String>,
    deferrable: bool,
    initially_deferred: bool,
    on_update: String,
    on_delete: String,
    description: Option<String>,
    index_type: Option<String>,
}

impl KeyRow {
    fn into_key(self) -> Result<LoadedKey> {
        let is_foreign = self.kind == "f";
        let action = |code: &str| -> Result<ReferentialAction> {
            if !is_foreign {
                return Ok(ReferentialAction::NoAction);
            }
            ReferentialAction::from_code(code).ok_or_else(|| {
                anyhow!(
                    "unknown referential action `{code}` on {}",
                    self.constraint_name
                )
            })
        };
        Ok(LoadedKey {
            on_update: action(&self.on_update)?,
            on_delete: action(&self.on_delete)?,
            column_names: self.column_names,
            foreign_schema: self.foreign_schema,
            foreign_table: self.foreign_table,
            foreign_column_names: self.foreign_column_names,
            deferrable: self.deferrable,
            initially_deferred: self.initially_deferred,
            description: self.description,
            // A foreign key's index belongs to the referenced table.
            index_type: if is_foreign { None } else { self.index_type },
        })
    }
}

async fn fetch_keys(pool: &PgPool) -> Result<Vec<KeyRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS schema_name,
               c.relname::text AS table_name,
               con.conname::text AS constraint_name,
               con.contype::text AS kind,
               ARRAY(
                   SELECT a.attname::text
                   FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
                   JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
                   ORDER BY k.ord
               ) AS column_names,
               fn.nspname::text AS foreign_schema,
               fc.relname::text AS foreign_table,
               ARRAY(
                   SELECT a.attname::text
                   FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord)
                   JOIN pg_attribute a ON a.attrelid = con.confrelid AND a.attnum = k.attnum
                   ORDER BY k.ord
               ) AS foreign_column_names,
               con.condeferrable AS deferrable,
               con.condeferred AS initially_deferred,
               con.confupdtype::text AS on_update,
               con.confdeltype::text AS on_delete,
               obj_description(con.oid, 'pg_constraint') AS description,
               am.amname::text AS index_type
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        LEFT JOIN pg_class fc ON fc.oid = con.confrelid
        LEFT JOIN pg_namespace fn ON fn.oid = fc.relnamespace
        LEFT JOIN pg_class ic ON ic.oid = con.conindid
        LEFT JOIN pg_am am ON am.oid = ic.relam
        WHERE con.contype IN ('p', 'f', 'u')
          AND c.relkind IN ('r', 'p')
          AND {USER_NAMESPACE}
        ORDER BY 1, 2, 3
        "#
    );
    sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch keys")
}

#[derive(Debug, FromRow)]
struct ValidationRow {
    schema_name: String,
    table_name: String,
    constraint_name: String,
    check_clause: String,
    column_names: Vec<String>,
    deferrable: bool,
    initially_deferred: bool,
    description: Option<String>,
}

async fn fetch_validations(pool: &PgPool) -> Result<Vec<ValidationRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS schema_name,
               c.relname::text AS table_name,
               con.conname::text AS constraint_name,
               pg_get_expr(con.conbin, con.conrelid) AS check_clause,
               ARRAY(
                   SELECT a.attname::text
                   FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
                   JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
                   ORDER BY k.ord
               ) AS column_names,
               con.condeferrable AS deferrable,
               con.condeferred AS initially_deferred,
               obj_description(con.oid, 'pg_constraint') AS description
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE con.contype = 'c'
          AND c.relkind IN ('r', 'p')
          AND {USER_NAMESPACE}
        ORDER BY 1, 2, 3
        "#
    );
    sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch check constraints")
}

#[derive(Debug, FromRow)]
struct IndexRow {
    schema_name: String,
    table_name: String,
    index_name: String,
    column_names: Vec<String>,
    include_column_names: Vec<String>,
    is_unique: bool,
    index_type: String,
    descending: bool,
    nulls_first: bool,
    where_clause: Option<String>,
    description: Option<String>,
}

impl IndexRow {
    /// Sort options are read off the first key column and apply to all.
    fn into_index(self) -> Result<LoadedIndex> {
        let index_type: IndexType = self
            .index_type
            .parse()
            .map_err(|e| anyhow!("index {}: {e}", self.index_name))?;
        Ok(LoadedIndex {
            column_names: self.column_names,
            include_column_names: self.include_column_names,
            unique: self.is_unique,
            index_type,
            order: if self.descending {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            },
            nulls_position: Some(if self.nulls_first {
                NullsPosition::First
            } else {
                NullsPosition::Last
            }),
            where_clause: self
                .where_clause
                .as_deref()
                .map(|w| strip_outer_parens(w).to_string()),
            description: self.description,
        })
    }
}

/// Plain column indexes not backing a constraint. Expression indexes have
/// no column list to model and are skipped.
async fn fetch_indexes(pool: &PgPool) -> Result<Vec<IndexRow>> {
    let sql = format!(
        r#"
        SELECT n.nspname::text AS schema_name,
               t.relname::text AS table_name,
               i.relname::text AS index_name,
               ARRAY(
                   SELECT a.attname::text
                   FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
                   JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
                   WHERE k.ord <= ix.indnkeyatts
                   ORDER BY k.ord
               ) AS column_names,
               ARRAY(
                   SELECT a.attname::text
                   FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
                   JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
                   WHERE k.ord > ix.indnkeyatts
                   ORDER BY k.ord
               ) AS include_column_names,
               ix.indisunique AS is_unique,
               am.amname::text AS index_type,
               COALESCE((ix.indoption[0] & 1) = 1, false) AS descending,
               COALESCE((ix.indoption[0] & 2) = 2, false) AS nulls_first,
               pg_get_expr(ix.indpred, ix.indrelid) AS where_clause,
               obj_description(i.oid, 'pg_class') AS description
        FROM pg_index ix
        JOIN pg_class i ON i.oid = ix.indexrelid
        JOIN pg_class t ON t.oid = ix.indrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        JOIN pg_am am ON am.oid = i.relam
        WHERE t.relkind IN ('r', 'p')
          AND {USER_NAMESPACE}
          AND NOT (0 = ANY (ix.indkey::int2[]))
          AND NOT EXISTS (
              SELECT 1 FROM pg_constraint con
              WHERE con.conindid = ix.indexrelid AND con.contype IN ('p', 'u', 'x')
          )
        ORDER BY 1, 2, 3
        "#
    );
    sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch indexes")
}

#[derive(Debug, FromRow)]
struct TriggerRow {
    schema_name: String,
    table_name: String,
    trigger_name: String,
    event_manipulation: String,
    action_timing: String,
    action_orientation: String,
    action_order: i32,
    action_condition: Option<String>,
    action_reference_old_table: Option<String>,
    action_reference_new_table: Option<String>,
    arguments: Vec<u8>,
    argument_count: i16,
    function_schema: String,
    function_name: String,
    function_definition: String,
    function_description: Option<String>,
    description: Option<String>,
}

impl TriggerRow {
    fn into_trigger(self) -> Result<LoadedTrigger> {
        Ok(LoadedTrigger {
            action_timing: parse_timing(&self.action_timing)?,
            event_manipulation: parse_event(&self.event_manipulation)?,
            action_order: self.action_order,
            action_condition: self.action_condition,
            parameters: split_arguments(&self.arguments, self.argument_count),
            function: LoadedFunction {
                schema: self.function_schema,
                name: self.function_name,
                definition: self.function_definition,
                description: self.function_description,
            },
            action_orientation: parse_orientation(&self.action_orientation)?,
            action_reference_old_table: self.action_reference_old_table,
            action_reference_new_table: self.action_reference_new_table,
            description: self.description,
        })
    }
}

/// One row per trigger. A trigger firing on several events is reported
/// with the first of them.
async fn fetch_triggers(pool: &PgPool) -> Result<Vec<TriggerRow>> {
    let sql = format!(
        r#"
        SELECT DISTINCT ON (tr.event_object_schema, tr.event_object_table, tr.trigger_name)
               tr.event_object_schema::text AS schema_name,
               tr.event_object_table::text AS table_name,
               tr.trigger_name::text AS trigger_name,
               lower(tr.event_manipulation) AS event_manipulation,
               lower(tr.action_timing) AS action_timing,
               lower(tr.action_orientation) AS action_orientation,
               tr.action_order::int4 AS action_order,
               tr.action_condition::text AS action_condition,
               tr.action_reference_old_table::text AS action_reference_old_table,
               tr.action_reference_new_table::text AS action_reference_new_table,
               pt.tgargs AS arguments,
               pt.tgnargs AS argument_count,
               pn.nspname::text AS function_schema,
               p.proname::text AS function_name,
               p.prosrc AS function_definition,
               obj_description(p.oid, 'pg_proc') AS function_description,
               obj_description(pt.oid, 'pg_trigger') AS description
        FROM information_schema.triggers tr
        JOIN pg_namespace n ON n.nspname = tr.event_object_schema
        JOIN pg_class c ON c.relnamespace = n.oid AND c.relname = tr.event_object_table
        JOIN pg_trigger pt ON pt.tgrelid = c.oid AND pt.tgname = tr.trigger_name
        JOIN pg_proc p ON p.oid = pt.tgfoid
        JOIN pg_namespace pn ON pn.oid = p.pronamespace
        WHERE NOT pt.tgisinternal
          AND {USER_NAMESPACE}
        ORDER BY tr.event_object_schema, tr.event_object_table, tr.trigger_name, tr.event_manipulation
        "#
    );
    let rows: Vec<TriggerRow> = sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to fetch triggers")?;
    debug!("Fetched {} triggers", rows.len());
    Ok(rows)
}

/// `tgargs` holds the arguments NUL-terminated, back to back.
fn split_arguments(raw: &[u8], count: i16) -> Vec<String> {
    raw.split(|b| *b == 0)
        .take(usize::try_from(count).unwrap_or_default())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect()
}

fn parse_event(value: &str) -> Result<TriggerEvent> {
    match value {
        "insert" => Ok(TriggerEvent::Insert),
        "update" => Ok(TriggerEvent::Update),
        "delete" => Ok(TriggerEvent::Delete),
        "truncate" => Ok(TriggerEvent::Truncate),
        other => Err(anyhow!("unknown trigger event `{other}`")),
    }
}

fn parse_timing(value: &str) -> Result<TriggerTiming> {
    match value {
        "before" => Ok(TriggerTiming::Before),
        "after" => Ok(TriggerTiming::After),
        "instead of" => Ok(TriggerTiming::InsteadOf),
        other => Err(anyhow!("unknown trigger timing `{other}`")),
    }
}

fn parse_orientation(value: &str) -> Result<TriggerOrientation> {
    match value {
        "row" => Ok(TriggerOrientation::Row),
        "statement" => Ok(TriggerOrientation::Statement),
        other => Err(anyhow!("unknown trigger orientation `{other}`")),
    }
}
