//! Table and column DDL.

use crate::catalog::collection::Named;
use crate::catalog::table::{Column, Table};
use crate::render::{qualified_name, quote_ident, quote_ident_list};

/// `"name" type [DEFAULT ..] [NOT NULL]`
pub fn render_column_definition(column: &Column) -> String {
    let mut definition = format!("{} {}", quote_ident(column.name()), column.data_type);
    if let Some(default) = &column.default {
        definition.push_str(&format!(" DEFAULT {default}"));
    }
    if !column.null {
        definition.push_str(" NOT NULL");
    }
    definition
}

/// Render a complete CREATE TABLE statement for the given table: columns
/// plus the primary key. Other constraints and indexes are separate
/// statements.
pub fn render_create_table(table: &Table) -> String {
    let mut definitions: Vec<String> = table
        .columns()
        .iter()
        .map(|column| format!("    {}", render_column_definition(column)))
        .collect();

    if let Ok(primary_key) = table.primary_key() {
        definitions.push(format!(
            "    CONSTRAINT {} PRIMARY KEY ({})",
            quote_ident(primary_key.name()),
            quote_ident_list(primary_key.column_names())
        ));
    }

    if definitions.is_empty() {
        return format!(
            "CREATE TABLE {} ();",
            qualified_name(table.schema_name(), table.name())
        );
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        qualified_name(table.schema_name(), table.name()),
        definitions.join(",\n")
    )
}

pub fn render_drop_table(schema: &str, table: &str) -> String {
    format!("DROP TABLE {};", qualified_name(schema, table))
}

pub fn render_add_column(schema: &str, table: &str, column: &Column) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {};",
        qualified_name(schema, table),
        render_column_definition(column)
    )
}

pub fn render_drop_column(schema: &str, table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {};",
        qualified_name(schema, table),
        quote_ident(column)
    )
}

/// Whether the two columns need a type change. Precision fields count too,
/// since they can differ while the spelled type does not.
pub fn type_differs(configured: &Column, loaded: &Column) -> bool {
    configured.data_type != loaded.data_type
        || configured.character_maximum_length != loaded.character_maximum_length
        || configured.numeric_precision != loaded.numeric_precision
        || configured.numeric_scale != loaded.numeric_scale
        || configured.datetime_precision != loaded.datetime_precision
        || configured.interval_type != loaded.interval_type
}

/// ALTER COLUMN statements turning `loaded` into `configured`: type, then
/// default, then nullability. Empty when only the description differs.
pub fn render_alter_column(
    schema: &str,
    table: &str,
    configured: &Column,
    loaded: &Column,
) -> Vec<String> {
    let target = format!(
        "ALTER TABLE {} ALTER COLUMN {}",
        qualified_name(schema, table),
        quote_ident(configured.name())
    );
    let mut statements = Vec::new();

    if type_differs(configured, loaded) {
        statements.push(format!(
            "{target} TYPE {} USING {}::{};",
            configured.data_type,
            quote_ident(configured.name()),
            configured.data_type
        ));
    }

    if configured.default != loaded.default {
        match &configured.default {
            Some(default) => statements.push(format!("{target} SET DEFAULT {default};")),
            None => statements.push(format!("{target} DROP DEFAULT;")),
        }
    }

    if configured.null != loaded.null {
        if configured.null {
            statements.push(format!("{target} DROP NOT NULL;"));
        } else {
            statements.push(format!("{target} SET NOT NULL;"));
        }
    }

    statements
}
