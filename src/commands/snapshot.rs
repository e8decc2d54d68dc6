//! pgmend snapshot - Capture the database structure as JSON
//!
//! A snapshot can stand in for a live database in `diff` and `generate`.

use crate::config::{Config, ObjectFilter};
use crate::db::{connect_to_database, introspect};
use crate::loader::LoadedStructure;
use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default)]
pub struct SnapshotArgs {
    /// Written to stdout when absent.
    pub output: Option<PathBuf>,
}

pub async fn cmd_snapshot(config: &Config, args: SnapshotArgs) -> Result<()> {
    let url = config
        .database
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("No database URL configured; pass --database-url or set DATABASE_URL"))?;

    let pool = connect_to_database(url, "target database").await?;
    let structure = introspect(&pool).await;
    pool.close().await;

    let structure = ObjectFilter::new(&config.objects).filter_structure(structure?);
    let json = serde_json::to_string_pretty(&structure).context("Failed to serialize snapshot")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
            info!("Wrote snapshot of {} schemas to {}", structure.schemas.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<LoadedStructure> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
}
