//! pgmend generate - Write migration files that bring a database in line
//! with the schema files

use crate::config::Config;
use crate::constants::MIGRATION_VERSION_FORMAT;
use crate::diff::diff;
use crate::plan::{MigrationUnit, PlanOptions, order_fragments, plan};
use crate::render::migration::{migration_file_name, render_unit};
use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::workspace::{LoadedSource, load_database};

#[derive(Debug, Default)]
pub struct GenerateArgs {
    /// Print the migrations instead of writing them.
    pub dry_run: bool,
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    UpToDate,
    Printed { units: usize },
    Written { files: Vec<PathBuf> },
}

pub async fn cmd_generate(config: &Config, root_dir: &Path, args: GenerateArgs) -> Result<GenerateOutcome> {
    let source = LoadedSource::resolve(config, args.snapshot.as_deref())?;
    let database = load_database(config, root_dir, &source).await?;

    let report = diff(&database);
    let options = PlanOptions {
        remove_unused: config.migration.remove_unused,
    };
    let fragments = plan(&database, &report, &options).context("Failed to plan migrations")?;
    debug!("Planned {} fragments", fragments.len());
    let units = order_fragments(fragments).context("Failed to order migrations")?;

    if units.is_empty() {
        println!("{}", style("No changes: database matches the schema files").green());
        return Ok(GenerateOutcome::UpToDate);
    }

    let version = Utc::now().format(MIGRATION_VERSION_FORMAT).to_string();
    let files = name_files(&version, &units);

    if args.dry_run {
        for (file_name, unit) in files.iter().zip(&units) {
            println!("{}", style(format!("-- {file_name}")).dim());
            println!("{}", render_unit(unit));
        }
        return Ok(GenerateOutcome::Printed { units: units.len() });
    }

    let migrations_dir = root_dir.join(&config.directories.migrations);
    std::fs::create_dir_all(&migrations_dir)
        .with_context(|| format!("Failed to create {}", migrations_dir.display()))?;

    let mut written = Vec::with_capacity(units.len());
    for (file_name, unit) in files.iter().zip(&units) {
        let path = migrations_dir.join(file_name);
        std::fs::write(&path, render_unit(unit))
            .with_context(|| format!("Failed to write migration: {}", path.display()))?;
        info!("Wrote {}", path.display());
        println!("Created {}", style(path.display()).cyan());
        written.push(path);
    }

    Ok(GenerateOutcome::Written { files: written })
}

/// File names share one version stamp; the index keeps them in order.
fn name_files(version: &str, units: &[MigrationUnit]) -> Vec<String> {
    units
        .iter()
        .enumerate()
        .map(|(i, unit)| migration_file_name(version, i + 1, &unit.name))
        .collect()
}
