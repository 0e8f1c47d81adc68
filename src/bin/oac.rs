//! oac - OpenAPI changes CLI tool
//!
//! Compares the schemas of two OpenAPI (or Swagger) documents and reports
//! what changed, flagging breaking changes.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use openapi_changes::index::DocumentIndex;
use openapi_changes::model::{Change, Changed};
use openapi_changes::rules::{BreakingRulesConfig, RuleSet};
use openapi_changes::schema::{compare_document_schemas, ComponentSchemaChanges, SchemaDiffer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit code when the documents could not be compared.
const EXIT_ERROR: u8 = 2;
/// Exit code for `--fail-on-breaking` when breaking changes were found.
const EXIT_BREAKING: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Shown with `--help`.
const AFTER_HELP: &str = "\
Changes are reported by path from the named schema, e.g. schemas.Pet.properties.id.type.
Source line and column numbers are not reported: documents are parsed without position tracking.";

/// Report schema changes between two OpenAPI documents.
#[derive(Debug, Parser)]
#[command(name = "oac", version, about, after_long_help = AFTER_HELP)]
struct Cli {
    /// The original document
    left: PathBuf,

    /// The changed document
    right: PathBuf,

    /// Breaking rules overrides (YAML, or JSON by extension)
    #[arg(short, long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Resolve references to the same location and compare their targets
    #[arg(long)]
    follow_refs: bool,

    /// Only report breaking changes
    #[arg(long)]
    breaking_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Exit with status 1 when breaking changes are found
    #[arg(long)]
    fail_on_breaking: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match run(&cli) {
        Ok(breaking) if breaking > 0 && cli.fail_on_breaking => ExitCode::from(EXIT_BREAKING),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Runs the comparison and returns the number of breaking changes.
fn run(cli: &Cli) -> Result<usize, Box<dyn std::error::Error>> {
    let rules = match &cli.rules {
        Some(path) => {
            let overrides = BreakingRulesConfig::load(path)?;
            tracing::debug!(path = %path.display(), "loaded breaking rules overrides");
            Arc::new(RuleSet::with_overrides(&overrides))
        }
        None => RuleSet::defaults(),
    };

    let left = DocumentIndex::load(&cli.left)?;
    let right = DocumentIndex::load(&cli.right)?;
    tracing::debug!(left = left.len(), right = right.len(), "documents loaded");

    let differ = SchemaDiffer::with_rules(rules).follow_references(cli.follow_refs);
    let changes = compare_document_schemas(&left, &right, &differ);
    let breaking = changes.total_breaking_changes();

    let stdout = io::stdout();
    let mut output = stdout.lock();
    match cli.format {
        Format::Json => write_json(changes.as_ref(), cli.breaking_only, &mut output)?,
        Format::Text => write_text(changes.as_ref(), cli.breaking_only, &mut output)?,
    }
    Ok(breaking)
}

fn write_text(
    changes: Option<&ComponentSchemaChanges>,
    breaking_only: bool,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(changes) = changes else {
        writeln!(output, "No changes")?;
        return Ok(());
    };
    for (path, change) in changes.changes_with_paths() {
        if breaking_only && !change.breaking() {
            continue;
        }
        let marker = if change.breaking() { "BREAKING" } else { "ok" };
        writeln!(output, "[{:>8}] {}: {}", marker, path, describe(change))?;
    }
    writeln!(
        output,
        "{} changes, {} breaking",
        changes.total_changes(),
        changes.total_breaking_changes()
    )?;
    Ok(())
}

fn describe(change: &Change) -> String {
    match (change.original(), change.new_value()) {
        (Some(from), Some(to)) => format!("{} ({} -> {})", change.kind(), from, to),
        (Some(from), None) => format!("{} ({})", change.kind(), from),
        (None, Some(to)) => format!("{} ({})", change.kind(), to),
        (None, None) => change.kind().to_string(),
    }
}

fn write_json(
    changes: Option<&ComponentSchemaChanges>,
    breaking_only: bool,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = match changes {
        Some(changes) if breaking_only => {
            let breaking: Vec<_> = changes
                .changes_with_paths()
                .into_iter()
                .filter(|(_, c)| c.breaking())
                .map(|(path, change)| serde_json::json!({ "path": path, "change": change }))
                .collect();
            serde_json::Value::Array(breaking)
        }
        Some(changes) => serde_json::to_value(changes)?,
        None => serde_json::Value::Null,
    };
    serde_json::to_writer_pretty(&mut *output, &report)?;
    writeln!(output)?;
    Ok(())
}
