use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonschema_dnf_core::{check_normalized, normalize, NormalizeOptions};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonschema-dnf")]
#[command(about = "Rewrite a JSON Schema into disjunctive normal form")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a JSON Schema into DNF
    Normalize {
        /// Input JSON Schema file (reads stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum recursion depth before giving up (unbounded if omitted)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Verify the result is well-formed normal form before printing it
        #[arg(long, default_value_t = false)]
        check: bool,
    },

    /// Check that a schema is already in well-formed normal form
    Check {
        /// Input JSON Schema file (reads stdin if omitted)
        input: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            max_depth,
            format,
            check,
        } => {
            let schema = read_schema(input.as_deref())?;
            let options = NormalizeOptions { max_depth };
            let result = normalize(&schema, &options).context("normalization failed")?;

            if check {
                check_normalized(&result).context("normalized output failed well-formedness check")?;
            }

            write_json(&result, output.as_ref(), format)?;
        }
        Commands::Check { input } => {
            let schema = read_schema(input.as_deref())?;
            check_normalized(&schema).context("schema is not in well-formed normal form")?;
            eprintln!("ok: schema is in well-formed normal form");
        }
    }

    Ok(())
}

/// Read and parse a JSON Schema from a file path, or stdin if `input` is `None`.
fn read_schema(input: Option<&Path>) -> Result<Value> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input file: {}", path.display()))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)
                .with_context(|| format!("failed to parse schema from: {}", path.display()))
        }
        None => serde_json::from_reader(io::stdin().lock()).context("failed to parse schema from stdin"),
    }
}

fn write_json(val: &Value, path: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p).with_context(|| format!("failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => serde_json::to_writer_pretty(&mut writer, val).context("failed to write JSON")?,
        OutputFormat::Compact => serde_json::to_writer(&mut writer, val).context("failed to write JSON")?,
    }

    writeln!(writer).context("failed to write trailing newline")?;
    Ok(())
}
