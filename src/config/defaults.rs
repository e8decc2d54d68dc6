use crate::config::types::*;
use crate::constants::{DEFAULT_MIGRATIONS_DIR, DEFAULT_SCHEMA_DIR};

// Config, DatabaseConfig, Objects, ObjectInclude and Migration derive Default

impl Default for Directories {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA_DIR.to_string(),
            migrations: DEFAULT_MIGRATIONS_DIR.to_string(),
        }
    }
}

impl Default for ObjectExclude {
    fn default() -> Self {
        Self {
            schemas: vec!["pg_*".to_string(), "information_schema".to_string()],
            tables: vec![],
        }
    }
}
