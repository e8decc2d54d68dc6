//! pgmend diff - Compare schema files against a database
//!
//! The schema files are the source of truth; the report shows how the
//! database deviates from them.

use crate::config::Config;
use crate::diff::{DiffReport, Difference, diff};
use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use std::path::{Path, PathBuf};

use super::workspace::{LoadedSource, load_database};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per difference
    #[default]
    Summary,
    /// The full two-sided report
    Json,
}

#[derive(Debug, Default)]
pub struct DiffArgs {
    pub format: OutputFormat,
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    InSync,
    Differences,
}

pub async fn cmd_diff(config: &Config, root_dir: &Path, args: DiffArgs) -> Result<DiffOutcome> {
    let source = LoadedSource::resolve(config, args.snapshot.as_deref())?;
    let database = load_database(config, root_dir, &source).await?;
    let report = diff(&database);

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize diff report")?;
            println!("{json}");
        }
        OutputFormat::Summary => print_summary(&report),
    }

    Ok(if report.has_differences() {
        DiffOutcome::Differences
    } else {
        DiffOutcome::InSync
    })
}

fn print_summary(report: &DiffReport) {
    let differences = report.differences();
    if differences.is_empty() {
        println!("{}", style("Database matches the schema files").green());
        return;
    }

    println!("{}", style("Differences (database -> schema files)").bold().underlined());
    for difference in &differences {
        let line = difference.to_string();
        let styled = match difference {
            Difference::Missing { .. } => style(line).green(),
            Difference::Unexpected { .. } => style(line).red(),
            Difference::Changed { .. } => style(line).yellow(),
        };
        println!("  {styled}");
    }
    println!(
        "\n{} difference{}",
        differences.len(),
        if differences.len() == 1 { "" } else { "s" }
    );
}
