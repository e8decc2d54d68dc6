use crate::constants::MAX_IDENTIFIER_LENGTH;
use crate::error::{Error, ObjectKind, Result};

/// Helper to check if a schema name is a system schema.
/// Introspection skips these; they are never part of a configured tree.
pub fn is_system_schema(schema: &str) -> bool {
    matches!(schema, "pg_catalog" | "information_schema" | "pg_toast")
        || schema.starts_with("pg_temp_")
        || schema.starts_with("pg_toast_temp_")
}

/// Checks that `name` is usable as an unquoted PostgreSQL identifier:
/// 1..=63 bytes, a letter or underscore first, then letters, digits,
/// underscores or dollar signs.
pub fn validate_identifier(object: ObjectKind, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation(object, name, "name must not be empty"));
    }
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(Error::validation(
            object,
            name,
            format!("name is longer than {MAX_IDENTIFIER_LENGTH} bytes"),
        ));
    }

    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err(Error::validation(
            object,
            name,
            "name may only contain letters, digits, `_` and `$`, and must not start with a digit",
        ));
    }
    Ok(())
}

/// Checks that a column list is non-empty and free of duplicates.
pub fn validate_column_list(object: ObjectKind, name: &str, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(Error::validation(object, name, "column list must not be empty"));
    }
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].contains(column) {
            return Err(Error::validation(
                object,
                name,
                format!("column `{column}` is listed more than once"),
            ));
        }
    }
    Ok(())
}
