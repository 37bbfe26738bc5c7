use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracker_tools::tracker::tools::{export, migrate};
use tracker_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Migrate(args) => execute_migrate(args),
        Command::Export(args) => execute_export(args),
    }
}

fn execute_migrate(args: MigrateArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let summary = migrate::migrate_workbook(&args.input, &args.output)?;
    println!(
        "migrated {} rows across {} sheets into {}",
        summary.rows,
        summary.sheets,
        args.output.display()
    );
    Ok(())
}

fn execute_export(args: ExportArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let summary = export::export_workbook(&args.input, &args.output)?;
    println!(
        "exported {} records to {}",
        summary.records,
        args.output.display()
    );
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))?;
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Normalise the tool tracker workbook and export it as JSON records."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite the legacy workbook into the canonical column schema.
    Migrate(MigrateArgs),
    /// Flatten the canonical workbook into the JSON record array.
    Export(ExportArgs),
}

#[derive(clap::Args)]
struct MigrateArgs {
    /// Legacy workbook to migrate.
    #[arg(long, default_value = "data.xlsx")]
    input: PathBuf,

    /// Destination for the canonical workbook.
    #[arg(long, default_value = "tool_tracker_migrated.xlsx")]
    output: PathBuf,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Canonical workbook to flatten.
    #[arg(long, default_value = "tool_tracker_migrated.xlsx")]
    input: PathBuf,

    /// Destination for the JSON record array.
    #[arg(long, default_value = "tools.json")]
    output: PathBuf,
}
