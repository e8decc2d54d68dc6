//! Database- and schema-level objects: extensions, schemas, enums, trigger
//! functions and the triggers that call them.

use crate::catalog::collection::Named;
use crate::catalog::enum_type::EnumType;
use crate::catalog::function::Function;
use crate::catalog::triggers::Trigger;
use crate::render::{escape_string, qualified_name, quote_ident};
use itertools::Itertools;

/// Dollar-quote tag for function bodies. Unlikely to clash with body text.
const BODY_TAG: &str = "$pgmend$";

pub fn render_create_extension(name: &str) -> String {
    format!("CREATE EXTENSION IF NOT EXISTS {};", quote_ident(name))
}

pub fn render_drop_extension(name: &str) -> String {
    format!("DROP EXTENSION IF EXISTS {};", quote_ident(name))
}

pub fn render_create_schema(name: &str) -> String {
    format!("CREATE SCHEMA {};", quote_ident(name))
}

pub fn render_drop_schema(name: &str) -> String {
    format!("DROP SCHEMA {};", quote_ident(name))
}

pub fn render_create_enum(schema: &str, enum_type: &EnumType) -> String {
    let labels = enum_type
        .values()
        .iter()
        .map(|v| escape_string(v))
        .join(", ");
    format!(
        "CREATE TYPE {} AS ENUM ({});",
        qualified_name(schema, enum_type.name()),
        labels
    )
}

/// Places `value` right after its predecessor in `wanted`, or before the
/// first existing label when it goes first.
pub fn render_add_enum_value(
    schema: &str,
    enum_name: &str,
    wanted: &[String],
    existing: &[String],
    value: &str,
) -> String {
    let mut sql = format!(
        "ALTER TYPE {} ADD VALUE {}",
        qualified_name(schema, enum_name),
        escape_string(value)
    );
    let position = wanted.iter().position(|v| v == value);
    match position {
        Some(0) => {
            if let Some(first) = existing.first() {
                sql.push_str(&format!(" BEFORE {}", escape_string(first)));
            }
        }
        Some(i) => sql.push_str(&format!(" AFTER {}", escape_string(&wanted[i - 1]))),
        None => {}
    }
    sql.push(';');
    sql
}

pub fn render_drop_enum(schema: &str, name: &str) -> String {
    format!("DROP TYPE {};", qualified_name(schema, name))
}

/// Trigger functions take no arguments and return `trigger`; updates reuse
/// this with `CREATE OR REPLACE`.
pub fn render_create_function(schema: &str, function: &Function) -> String {
    format!(
        "CREATE OR REPLACE FUNCTION {}() RETURNS trigger LANGUAGE plpgsql AS {BODY_TAG}\n{}\n{BODY_TAG};",
        qualified_name(schema, function.name()),
        function.definition()
    )
}

pub fn render_drop_function(schema: &str, name: &str) -> String {
    format!("DROP FUNCTION {}();", qualified_name(schema, name))
}

/// Identifier for `COMMENT ON FUNCTION`.
pub fn function_target(schema: &str, name: &str) -> String {
    format!("{}()", qualified_name(schema, name))
}

pub fn render_create_trigger(schema: &str, table: &str, trigger: &Trigger) -> String {
    let mut sql = format!(
        "CREATE TRIGGER {} {} {} ON {}",
        quote_ident(trigger.name()),
        trigger.action_timing.as_sql(),
        trigger.event_manipulation.as_sql(),
        qualified_name(schema, table)
    );

    let mut references = Vec::new();
    if let Some(old) = &trigger.action_reference_old_table {
        references.push(format!("OLD TABLE AS {}", quote_ident(old)));
    }
    if let Some(new) = &trigger.action_reference_new_table {
        references.push(format!("NEW TABLE AS {}", quote_ident(new)));
    }
    if !references.is_empty() {
        sql.push_str(&format!(" REFERENCING {}", references.join(" ")));
    }

    sql.push_str(&format!(
        " FOR EACH {}",
        trigger.action_orientation.as_sql()
    ));

    if let Some(condition) = &trigger.action_condition {
        sql.push_str(&format!(" WHEN ({condition})"));
    }

    let parameters = trigger
        .parameters
        .iter()
        .map(|p| escape_string(p))
        .join(", ");
    sql.push_str(&format!(
        " EXECUTE FUNCTION {}({});",
        qualified_name(&trigger.function_schema, &trigger.function_name),
        parameters
    ));
    sql
}

pub fn render_drop_trigger(schema: &str, table: &str, name: &str) -> String {
    format!(
        "DROP TRIGGER {} ON {};",
        quote_ident(name),
        qualified_name(schema, table)
    )
}

/// Identifier for `COMMENT ON TRIGGER`.
pub fn trigger_target(schema: &str, table: &str, name: &str) -> String {
    format!("{} ON {}", quote_ident(name), qualified_name(schema, table))
}
