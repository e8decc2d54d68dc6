// Configuration file name
pub const CONFIG_FILENAME: &str = "pgmend.yaml";

// Default project directories, relative to the config file
pub const DEFAULT_SCHEMA_DIR: &str = "schema";
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

// PostgreSQL truncates identifiers longer than NAMEDATALEN - 1 bytes
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

// Migration file naming
pub const MIGRATION_FILE_EXTENSION: &str = "sql";
pub const MIGRATION_VERSION_FORMAT: &str = "%Y%m%d%H%M%S";
