use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optable_core::{OptionTable, ParseError, TableFile, Values};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Exit status for arguments rejected by a table.
const PARSE_FAILURE_EXIT: i32 = 2;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "optable")]
#[command(about = "Validate, document and exercise command-line option tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that a table file describes a valid option table.
    Validate(TableArgs),
    /// Print usage text for a table file.
    Usage(TableArgs),
    /// Parse arguments against a table file and print the collected values.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Path to a table file (.yaml, .yml or .json).
    #[arg(long)]
    table: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Path to a table file (.yaml, .yml or .json).
    #[arg(long)]
    table: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to parse; put them after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

/// Result of a successful `parse` run.
#[derive(Debug, Serialize)]
struct ParseReport {
    values: Values,
    leftover: Vec<String>,
}

/// Outcome of a failed command: a message and the exit status to use.
struct Failure {
    message: String,
    code: i32,
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self { message, code: 1 }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Usage(args) => run_usage(args),
        Command::Parse(args) => run_parse(args),
    };

    if let Err(failure) = result {
        eprintln!("error: {}", failure.message);
        std::process::exit(failure.code);
    }
}

fn load_table(path: &Path) -> Result<(TableFile, OptionTable), String> {
    let file =
        TableFile::load(path).map_err(|e| format!("failed to load {}: {e}", path.display()))?;
    let table = file
        .build()
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((file, table))
}

fn run_validate(args: TableArgs) -> Result<(), Failure> {
    let (file, table) = load_table(&args.table)?;
    tracing::info!(
        program = file.program_name(),
        options = table.descriptors().len(),
        "Table is valid"
    );
    println!("ok: {} ({} options)", file.program_name(), table.descriptors().len());
    Ok(())
}

fn run_usage(args: TableArgs) -> Result<(), Failure> {
    let (file, table) = load_table(&args.table)?;
    println!("Usage: {} [options]\n", file.program_name());
    print!("{}", table.usage());
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let (file, table) = load_table(&args.table)?;

    let mut values = Values::default();
    let leftover = match table.parse(&args.args, &mut values) {
        Ok(leftover) => leftover,
        Err(err) => return Err(parse_failure(&file, &table, &err)),
    };

    let report = ParseReport { values, leftover };
    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn parse_failure(file: &TableFile, table: &OptionTable, err: &ParseError) -> Failure {
    let mut message = format!("{}: {err}", file.program_name());
    let usage = table.usage();
    if !usage.is_empty() {
        message.push_str("\n\nOptions:\n");
        message.push_str(usage.trim_end());
    }
    Failure {
        message,
        code: PARSE_FAILURE_EXIT,
    }
}
