//! Constraint DDL: primary, foreign and unique keys and check constraints.

use crate::catalog::collection::Named;
use crate::catalog::constraint::{
    ForeignKeyConstraint, PrimaryKey, ReferentialAction, UniqueConstraint, Validation,
};
use crate::render::{qualified_name, quote_ident, quote_ident_list};

fn deferrable_clause(deferrable: bool, initially_deferred: bool) -> &'static str {
    match (deferrable, initially_deferred) {
        (false, _) => "",
        (true, false) => " DEFERRABLE INITIALLY IMMEDIATE",
        (true, true) => " DEFERRABLE INITIALLY DEFERRED",
    }
}

fn add_constraint(schema: &str, table: &str, name: &str, definition: &str) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} {};",
        qualified_name(schema, table),
        quote_ident(name),
        definition
    )
}

pub fn render_add_primary_key(schema: &str, table: &str, primary_key: &PrimaryKey) -> String {
    add_constraint(
        schema,
        table,
        primary_key.name(),
        &format!("PRIMARY KEY ({})", quote_ident_list(primary_key.column_names())),
    )
}

pub fn render_add_foreign_key(schema: &str, table: &str, foreign_key: &ForeignKeyConstraint) -> String {
    let mut definition = format!(
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        quote_ident_list(foreign_key.column_names()),
        qualified_name(&foreign_key.foreign_schema, &foreign_key.foreign_table),
        quote_ident_list(foreign_key.foreign_column_names())
    );
    if foreign_key.on_update != ReferentialAction::NoAction {
        definition.push_str(&format!(" ON UPDATE {}", foreign_key.on_update.as_sql()));
    }
    if foreign_key.on_delete != ReferentialAction::NoAction {
        definition.push_str(&format!(" ON DELETE {}", foreign_key.on_delete.as_sql()));
    }
    definition.push_str(deferrable_clause(
        foreign_key.deferrable,
        foreign_key.initially_deferred,
    ));
    add_constraint(schema, table, foreign_key.name(), &definition)
}

pub fn render_add_unique(schema: &str, table: &str, unique: &UniqueConstraint) -> String {
    let definition = format!(
        "UNIQUE ({}){}",
        quote_ident_list(unique.column_names()),
        deferrable_clause(unique.deferrable, unique.initially_deferred)
    );
    add_constraint(schema, table, unique.name(), &definition)
}

/// Check clauses may arrive with or without the `CHECK (...)` wrapper that
/// `pg_get_constraintdef()` adds.
pub fn render_add_check(schema: &str, table: &str, validation: &Validation) -> String {
    let clause = validation.check_clause.trim();
    let mut definition = if clause.starts_with("CHECK") {
        clause.to_string()
    } else {
        format!("CHECK ({clause})")
    };
    definition.push_str(deferrable_clause(
        validation.deferrable,
        validation.initially_deferred,
    ));
    add_constraint(schema, table, validation.name(), &definition)
}

pub fn render_drop_constraint(schema: &str, table: &str, name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {};",
        qualified_name(schema, table),
        quote_ident(name)
    )
}

/// Identifier for `COMMENT ON CONSTRAINT`.
pub fn constraint_target(schema: &str, table: &str, name: &str) -> String {
    format!("{} ON {}", quote_ident(name), qualified_name(schema, table))
}
