//! CREATE / DROP INDEX statements.

use crate::catalog::collection::Named;
use crate::catalog::index::{Index, NullsPosition, SortOrder};
use crate::render::{qualified_name, quote_ident, quote_ident_list};

/// Render a complete CREATE INDEX statement. Sort order and null placement
/// apply to every key column and are only spelled out when they differ from
/// PostgreSQL's defaults.
pub fn render_create_index(schema: &str, table: &str, index: &Index) -> String {
    let mut sql = String::from("CREATE ");
    if index.unique {
        sql.push_str("UNIQUE ");
    }
    sql.push_str(&format!(
        "INDEX {} ON {} USING {}",
        quote_ident(index.name()),
        qualified_name(schema, table),
        index.index_type.as_str()
    ));

    let mut ordering = String::new();
    if index.order == SortOrder::Desc {
        ordering.push_str(" DESC");
    }
    if index.nulls_position != NullsPosition::default_for(index.order) {
        ordering.push_str(match index.nulls_position {
            NullsPosition::First => " NULLS FIRST",
            NullsPosition::Last => " NULLS LAST",
        });
    }

    let columns: Vec<String> = index
        .column_names()
        .iter()
        .map(|c| format!("{}{}", quote_ident(c), ordering))
        .collect();
    sql.push_str(&format!(" ({})", columns.join(", ")));

    if !index.include_column_names.is_empty() {
        sql.push_str(&format!(
            " INCLUDE ({})",
            quote_ident_list(&index.include_column_names)
        ));
    }

    if let Some(predicate) = &index.where_clause {
        sql.push_str(&format!(" WHERE {predicate}"));
    }

    sql.push(';');
    sql
}

pub fn render_drop_index(schema: &str, name: &str) -> String {
    format!("DROP INDEX {};", qualified_name(schema, name))
}
