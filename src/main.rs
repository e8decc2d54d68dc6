use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pgmend::commands::{self, DiffOutcome, OutputFormat};
use pgmend::config;
use pgmend::constants::CONFIG_FILENAME;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for pgmend diff (schema files vs database)
#[derive(Parser, Debug)]
struct DiffArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Compare against a snapshot file instead of a live database
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[command(flatten)]
    database_args: config::DatabaseArgs,

    #[command(flatten)]
    directory_args: config::DirectoryArgs,

    #[command(flatten)]
    object_filter_args: config::ObjectFilterArgs,
}

/// Arguments for pgmend generate
#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Print the migrations instead of writing files
    #[arg(long)]
    dry_run: bool,

    /// Plan against a snapshot file instead of a live database
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[command(flatten)]
    database_args: config::DatabaseArgs,

    #[command(flatten)]
    directory_args: config::DirectoryArgs,

    #[command(flatten)]
    object_filter_args: config::ObjectFilterArgs,

    #[command(flatten)]
    migration_args: config::MigrationArgs,
}

/// Arguments for pgmend snapshot
#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Write the snapshot here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[command(flatten)]
    database_args: config::DatabaseArgs,

    #[command(flatten)]
    object_filter_args: config::ObjectFilterArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare schema files with the database (exit code 1 on differences)
    Diff(DiffArgs),

    /// Generate migration files from the differences
    Generate(GenerateArgs),

    /// Save the database structure as a JSON snapshot
    Snapshot(SnapshotArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    run_main(cli).await
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_main(cli: Cli) -> Result<()> {
    let (file_config, root_dir) = config::load_config(&cli.config_file)?;

    match cli.command {
        Commands::Diff(args) => {
            let cli_config = config::ConfigInput {
                database: Some(args.database_args.into()),
                directories: Some(args.directory_args.into()),
                objects: Some(args.object_filter_args.into()),
                ..Default::default()
            };
            let config = config::ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            info!("Comparing schema files with the database");
            let outcome = commands::cmd_diff(
                &config,
                &root_dir,
                commands::DiffArgs {
                    format: args.format,
                    snapshot: args.snapshot,
                },
            )
            .await?;

            // Exit with code 1 if differences found
            if outcome == DiffOutcome::Differences {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Generate(args) => {
            let cli_config = config::ConfigInput {
                database: Some(args.database_args.into()),
                directories: Some(args.directory_args.into()),
                objects: Some(args.object_filter_args.into()),
                migration: Some(args.migration_args.into()),
                ..Default::default()
            };
            let config = config::ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            info!("Generating migrations");
            commands::cmd_generate(
                &config,
                &root_dir,
                commands::GenerateArgs {
                    dry_run: args.dry_run,
                    snapshot: args.snapshot,
                },
            )
            .await?;
            Ok(())
        }
        Commands::Snapshot(args) => {
            let cli_config = config::ConfigInput {
                database: Some(args.database_args.into()),
                objects: Some(args.object_filter_args.into()),
                ..Default::default()
            };
            let config = config::ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            commands::cmd_snapshot(&config, commands::SnapshotArgs { output: args.output }).await
        }
    }
}
