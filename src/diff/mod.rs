//! Two-sided comparison of the configured and loaded trees.
//!
//! The report is built by walking the trees twice with roles swapped: the
//! `configuration` side uses the configured tree as base, the `database` side
//! the loaded one. Each side only expands entities that exist on it.

pub mod node;
pub mod tracked;

pub use node::{AttributeMatch, Child, Node, Tracked, compare_collection, compare_record};

use crate::catalog::schema::Schema;
use crate::catalog::table::Table;
use crate::catalog::{Catalog, Database};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Existence and match report for both sides, keyed by schema name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub configuration: BTreeMap<String, Node>,
    pub database: BTreeMap<String, Node>,
}

/// Compares the configured and loaded trees of `database`.
///
/// Pure: reads both trees and nothing else. Validations and trigger
/// conditions compare by their normalized text only if that has already been
/// computed, see [`crate::plan::normalize_for_comparison`].
pub fn diff(database: &Database) -> DiffReport {
    debug!("Comparing configured and loaded trees");
    DiffReport {
        configuration: compare_catalogs(database.configured(), database.loaded()),
        database: compare_catalogs(database.loaded(), database.configured()),
    }
}

fn compare_catalogs(base: &Catalog, comparison: &Catalog) -> BTreeMap<String, Node> {
    compare_collection(base.schemas(), Some(comparison.schemas()), compare_schema)
}

fn compare_schema(base: Option<&Schema>, comparison: Option<&Schema>) -> Node {
    let mut node = compare_record(base, comparison);
    let Some(base) = base else {
        return node;
    };

    node.add_collection(
        "tables",
        compare_collection(base.tables(), comparison.map(Schema::tables), compare_table),
    );
    node.add_collection(
        "enums",
        compare_collection(base.enums(), comparison.map(Schema::enums), compare_record),
    );
    node.add_collection(
        "functions",
        compare_collection(
            base.functions(),
            comparison.map(Schema::functions),
            compare_record,
        ),
    );
    node
}

fn compare_table(base: Option<&Table>, comparison: Option<&Table>) -> Node {
    let mut node = compare_record(base, comparison);
    let Some(base) = base else {
        return node;
    };

    node.add_collection(
        "columns",
        compare_collection(base.columns(), comparison.map(Table::columns), compare_record),
    );
    node.add_record(
        "primary_key",
        compare_record(
            base.primary_key_entry(),
            comparison.and_then(Table::primary_key_entry),
        ),
    );
    node.add_collection(
        "foreign_key_constraints",
        compare_collection(
            base.foreign_key_constraints(),
            comparison.map(Table::foreign_key_constraints),
            compare_record,
        ),
    );
    node.add_collection(
        "unique_constraints",
        compare_collection(
            base.unique_constraints(),
            comparison.map(Table::unique_constraints),
            compare_record,
        ),
    );
    node.add_collection(
        "validations",
        compare_collection(
            base.validations(),
            comparison.map(Table::validations),
            compare_record,
        ),
    );
    node.add_collection(
        "indexes",
        compare_collection(base.indexes(), comparison.map(Table::indexes), compare_record),
    );
    node.add_collection(
        "triggers",
        compare_collection(base.triggers(), comparison.map(Table::triggers), compare_record),
    );
    node
}

/// One line of a human-readable difference listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    /// Configured but not in the database.
    Missing { path: String },
    /// In the database but not configured.
    Unexpected { path: String },
    Changed {
        path: String,
        attribute: &'static str,
        configured: Value,
        loaded: Value,
    },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Missing { path } => write!(f, "+ {path}"),
            Difference::Unexpected { path } => write!(f, "- {path}"),
            Difference::Changed {
                path,
                attribute,
                configured,
                loaded,
            } => write!(f, "~ {path}.{attribute}: {loaded} -> {configured}"),
        }
    }
}

impl DiffReport {
    pub fn has_differences(&self) -> bool {
        !self.differences().is_empty()
    }

    /// Every difference, walking both sides in path order. Children of an
    /// entity present on only one side are not listed separately.
    pub fn differences(&self) -> Vec<Difference> {
        let mut out = Vec::new();
        let names: BTreeSet<&String> = self
            .configuration
            .keys()
            .chain(self.database.keys())
            .collect();
        for name in names {
            collect_differences(
                name.clone(),
                self.configuration.get(name),
                self.database.get(name),
                &mut out,
            );
        }
        out
    }
}

fn collect_differences(
    path: String,
    configured: Option<&Node>,
    loaded: Option<&Node>,
    out: &mut Vec<Difference>,
) {
    let configured = configured.filter(|n| n.exists);
    let loaded = loaded.filter(|n| n.exists);

    let (configured, loaded) = match (configured, loaded) {
        (Some(c), Some(l)) => (c, l),
        (Some(_), None) => {
            out.push(Difference::Missing { path });
            return;
        }
        (None, Some(_)) => {
            out.push(Difference::Unexpected { path });
            return;
        }
        (None, None) => return,
    };

    for (attribute, value) in &configured.attributes {
        if value.matches {
            continue;
        }
        out.push(Difference::Changed {
            path: path.clone(),
            attribute: *attribute,
            configured: value.value.clone(),
            loaded: loaded
                .attribute(attribute)
                .map(|a| a.value.clone())
                .unwrap_or(Value::Null),
        });
    }

    // Both sides of an entity present on both carry the same children.
    for (name, child) in &configured.children {
        match (child, loaded.children.get(name)) {
            (Child::Collection(c), Some(Child::Collection(l))) => {
                let keys: BTreeSet<&String> = c.keys().chain(l.keys()).collect();
                for key in keys {
                    collect_differences(format!("{path}.{name}.{key}"), c.get(key), l.get(key), out);
                }
            }
            (Child::Record(c), Some(Child::Record(l))) => {
                collect_differences(format!("{path}.{name}"), Some(c.as_ref()), Some(l.as_ref()), out);
            }
            _ => {}
        }
    }
}
