use crate::config::types::{ObjectExclude, ObjectInclude, Objects};
use crate::loader::LoadedStructure;
use glob::Pattern;
use tracing::debug;

/// Object filter for determining which schemas and tables pgmend manages
#[derive(Debug, Clone)]
pub struct ObjectFilter {
    include: ObjectInclude,
    exclude: ObjectExclude,
}

impl ObjectFilter {
    /// Create a new object filter from configuration
    pub fn new(config: &Objects) -> Self {
        Self {
            include: config.include.clone(),
            exclude: config.exclude.clone(),
        }
    }

    /// Check if a schema should be included
    pub fn should_include_schema(&self, schema_name: &str) -> bool {
        // Check exclude patterns first
        if self.matches_patterns(&self.exclude.schemas, schema_name) {
            return false;
        }

        // If include patterns are specified, schema must match one of them
        if !self.include.schemas.is_empty() {
            return self.matches_patterns(&self.include.schemas, schema_name);
        }

        true
    }

    /// Check if a table should be included
    pub fn should_include_table(&self, schema_name: &str, table_name: &str) -> bool {
        if !self.should_include_schema(schema_name) {
            return false;
        }

        if self.matches_patterns(&self.exclude.tables, table_name) {
            return false;
        }

        if !self.include.tables.is_empty() {
            return self.matches_patterns(&self.include.tables, table_name);
        }

        true
    }

    /// Apply filter to introspected data, removing objects that shouldn't be
    /// managed. Foreign keys pointing at a filtered-out table go as well, since
    /// their target would not exist in the loaded tree.
    pub fn filter_structure(&self, mut structure: LoadedStructure) -> LoadedStructure {
        structure
            .schemas
            .retain(|schema, _| self.should_include_schema(schema));
        for (schema_name, schema) in structure.schemas.iter_mut() {
            schema
                .tables
                .retain(|table, _| self.should_include_table(schema_name, table));
        }
        structure
            .enums
            .retain(|schema, _| self.should_include_schema(schema));
        structure
            .functions
            .retain(|schema, _| self.should_include_schema(schema));

        retain_tables(&mut structure.keys, |s, t| self.should_include_table(s, t));
        retain_tables(&mut structure.triggers, |s, t| self.should_include_table(s, t));
        retain_tables(&mut structure.validations, |s, t| self.should_include_table(s, t));
        retain_tables(&mut structure.indexes, |s, t| self.should_include_table(s, t));

        for (schema_name, tables) in structure.keys.iter_mut() {
            for keys in tables.values_mut() {
                keys.foreign_key.retain(|name, key| {
                    let target_schema = key.foreign_schema.as_deref().unwrap_or(schema_name);
                    let target_table = key.foreign_table.as_deref().unwrap_or_default();
                    let keep = self.should_include_table(target_schema, target_table);
                    if !keep {
                        debug!(
                            "Skipping foreign key {name} to filtered table {target_schema}.{target_table}"
                        );
                    }
                    keep
                });
            }
        }

        structure
    }

    /// Check if a name matches any of the glob patterns
    fn matches_patterns(&self, patterns: &[String], name: &str) -> bool {
        if patterns.is_empty() {
            return false;
        }

        patterns.iter().any(|pattern| {
            Pattern::new(pattern)
                .map(|p| p.matches(name))
                .unwrap_or(false)
        })
    }
}

fn retain_tables<T>(
    by_schema: &mut std::collections::BTreeMap<String, std::collections::BTreeMap<String, T>>,
    keep: impl Fn(&str, &str) -> bool,
) {
    by_schema.retain(|schema, tables| {
        tables.retain(|table, _| keep(schema, table));
        !tables.is_empty()
    });
}
