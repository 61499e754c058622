use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsonc_heal_core::{heal, template, Options, Path, Schema, VariantHint};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonc-heal")]
#[command(about = "Generate and heal commented JSONC configuration files from a JSON Schema")]
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
    /// Write a fresh template document for a schema
    Template {
        /// JSON Schema file
        schema: PathBuf,

        /// Choose union branches, e.g. `--hint connection.kind=mssql` (repeatable)
        #[arg(long = "hint", value_name = "PATH=VALUE", value_parser = parse_hint)]
        hints: Vec<VariantHint>,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add missing properties and refresh comments in an existing document
    Heal {
        /// JSON Schema file
        schema: PathBuf,

        /// JSONC document to heal (a missing file is healed from empty)
        config: PathBuf,

        /// Overwrite the document in place
        #[arg(long, conflicts_with = "output")]
        write: bool,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave comments that differ from the schema description untouched
        #[arg(long)]
        keep_comments: bool,
    },

    /// Report violations and pending changes without writing anything
    Check {
        /// JSON Schema file
        schema: PathBuf,

        /// JSONC document to check
        config: PathBuf,

        /// Leave comments that differ from the schema description untouched
        #[arg(long)]
        keep_comments: bool,
    },
}

/// `path=value`, where the value is JSON when it parses and a bare string
/// otherwise.
fn parse_hint(raw: &str) -> Result<VariantHint, String> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got `{raw}`"))?;
    if path.is_empty() {
        return Err(format!("hint `{raw}` has an empty path"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(VariantHint::new(Path::parse(path), value))
}

fn options(keep_comments: bool) -> Options {
    if keep_comments {
        Options::keep_comments()
    } else {
        Options::default()
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the document
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Template {
            schema,
            hints,
            output,
        } => {
            let schema = load_schema(&schema)?;
            let result = template(&schema, &hints, &Options::default());
            write_text(&result.text, output.as_ref())?;
        }
        Commands::Heal {
            schema,
            config,
            write,
            output,
            keep_comments,
        } => {
            let schema = load_schema(&schema)?;
            let text = read_config(&config)?;
            let healed = heal(&schema, &text, &options(keep_comments));

            for violation in &healed.errors {
                eprintln!("Warning: {violation}");
            }

            let target = if write { Some(&config) } else { output.as_ref() };
            write_text(&healed.text, target)?;
        }
        Commands::Check {
            schema,
            config,
            keep_comments,
        } => {
            let schema = load_schema(&schema)?;
            let text = read_config(&config)?;
            let healed = heal(&schema, &text, &options(keep_comments));

            for violation in &healed.errors {
                eprintln!("Error: {violation}");
            }
            let pending = healed.text != text;
            if pending {
                eprintln!("{} is not up to date with its schema", config.display());
            }
            if pending || !healed.errors.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_schema(path: &PathBuf) -> Result<Schema> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open schema file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let document: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse schema from: {}", path.display()))?;
    Schema::from_json_schema(&document)
        .map_err(|e| anyhow::Error::from(e).context(format!("Unsupported schema: {}", path.display())))
}

fn read_config(path: &PathBuf) -> Result<String> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "document does not exist, healing from empty");
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))
}

fn write_text(text: &str, path: Option<&PathBuf>) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    writer
        .write_all(text.as_bytes())
        .context("Failed to write document")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
