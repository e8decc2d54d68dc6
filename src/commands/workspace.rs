//! Shared setup for the commands that compare schema files with a database.

use crate::catalog::{Catalog, Database};
use crate::catalog::normalize::LexicalNormalizer;
use crate::config::{Config, ObjectFilter};
use crate::db::{PgNormalizer, connect_to_database, introspect};
use crate::loader::{LoadedStructure, build_loaded_catalog};
use crate::plan::normalize_for_comparison;
use crate::schema_loader::load_configured_catalog;
use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::snapshot::read_snapshot;

/// Where the loaded side of the comparison comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedSource {
    Database(String),
    Snapshot(PathBuf),
}

impl LoadedSource {
    /// `--snapshot` wins over any configured database URL.
    pub fn resolve(config: &Config, snapshot: Option<&Path>) -> Result<Self> {
        if let Some(path) = snapshot {
            return Ok(Self::Snapshot(path.to_path_buf()));
        }
        config
            .database
            .url
            .clone()
            .map(Self::Database)
            .ok_or_else(|| {
                anyhow!("No database URL configured; pass --database-url, set DATABASE_URL or use --snapshot")
            })
    }
}

/// Builds both trees and normalizes the expressions whose text differs, so
/// the result is ready for [`crate::diff::diff`].
pub async fn load_database(config: &Config, root_dir: &Path, source: &LoadedSource) -> Result<Database> {
    let filter = ObjectFilter::new(&config.objects);

    let schema_dir = root_dir.join(&config.directories.schema);
    info!("Loading schema files from {}", schema_dir.display());
    let configured = load_configured_catalog(&schema_dir, &config.extensions, &filter)
        .with_context(|| format!("Failed to load schema files from {}", schema_dir.display()))?;

    let structure = match source {
        LoadedSource::Database(url) => {
            let pool = connect_to_database(url, "target database").await?;
            let structure = introspect(&pool).await;
            pool.close().await;
            structure?
        }
        LoadedSource::Snapshot(path) => read_snapshot(path)?,
    };
    let database = build_database(configured, filter.filter_structure(structure))?;

    let failures = match source {
        LoadedSource::Database(url) => {
            let normalizer = PgNormalizer::connect(url).await?;
            let failures = normalize_for_comparison(&database, &normalizer);
            normalizer.close().await;
            failures
        }
        LoadedSource::Snapshot(_) => normalize_for_comparison(&database, &LexicalNormalizer),
    };
    if !failures.is_empty() {
        warn!(
            "{} expressions could not be normalized and are compared as written",
            failures.len()
        );
    }

    Ok(database)
}

fn build_database(configured: Catalog, structure: LoadedStructure) -> Result<Database> {
    let loaded = build_loaded_catalog(&structure).context("Failed to build the database catalog")?;
    Ok(Database::new(configured, loaded)?)
}
