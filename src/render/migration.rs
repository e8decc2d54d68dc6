//! Migration file bodies and names.

use crate::constants::MIGRATION_FILE_EXTENSION;
use crate::plan::unit::MigrationUnit;

/// Renders a unit as a standalone SQL file: a header naming the unit, then
/// each fragment's payload preceded by a comment describing it.
pub fn render_unit(unit: &MigrationUnit) -> String {
    let mut sql = format!("-- Migration: {}\n", unit.name);

    for fragment in unit.fragments() {
        sql.push('\n');
        sql.push_str(&format!(
            "-- {}: {}\n",
            fragment.change_kind, fragment.object_name
        ));
        if let Some(annotation) = &fragment.annotation {
            for line in annotation.lines() {
                sql.push_str(&format!("-- {line}\n"));
            }
        }
        if fragment.change_kind.is_destructive() {
            sql.push_str("-- WARNING: destructive change, data may be lost\n");
        }
        sql.push_str(&fragment.payload);
        if !fragment.payload.ends_with('\n') {
            sql.push('\n');
        }
    }

    sql
}

/// Lowercase ASCII words of `name` joined with underscores.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `{version}{index:02}_{slug}.sql`. The index keeps files of one run
/// sorted in emission order.
pub fn migration_file_name(version: &str, index: usize, name: &str) -> String {
    format!(
        "{version}{index:02}_{}.{MIGRATION_FILE_EXTENSION}",
        slugify(name)
    )
}
