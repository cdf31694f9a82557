//! racer-score: offline reward scoring
//!
//! Scores JSON-lines logs of simulator parameter snapshots with a built-in or
//! file-supplied reward variant, and prints variant tables.

mod score;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use racer_reward::{VariantFile, VariantRegistry};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(name = "racer-score", version, about = "Score DeepRacer snapshots offline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one JSON snapshot per input line
    Score {
        /// Variant to score with
        #[arg(long, short, default_value = "paced")]
        variant: String,
        /// Extra variants file (JSON)
        #[arg(long, short)]
        config: Option<PathBuf>,
        /// Input file, `-` or absent for stdin
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Print per-term components as JSON
        #[arg(long, short)]
        breakdown: bool,
    },
    /// List variants and their term chains
    Variants {
        /// Extra variants file (JSON)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
    /// Print a variant table as JSON
    Show {
        name: String,
        /// Extra variants file (JSON)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
}

fn load_registry(config: Option<&Path>) -> Result<VariantRegistry> {
    let mut registry = VariantRegistry::with_builtins();
    if let Some(path) = config {
        let file = VariantFile::load(path)
            .with_context(|| format!("Failed to load variants from {}", path.display()))?;
        registry
            .merge(file)
            .with_context(|| format!("Invalid variant in {}", path.display()))?;
    }
    Ok(registry)
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match input {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Score {
            variant,
            config,
            input,
            breakdown,
        } => {
            let registry = load_registry(config.as_deref())?;
            let evaluator = registry.evaluator(&variant)?;
            let reader = open_input(input.as_deref())?;
            let scored = score::score_lines(&evaluator, reader, &mut out, breakdown)?;
            info!(variant = %variant, snapshots = scored, "scoring complete");
        }
        Command::Variants { config } => {
            let registry = load_registry(config.as_deref())?;
            for (name, variant) in registry.iter() {
                writeln!(out, "{name}: {}", variant.term_names().join(" -> "))?;
            }
        }
        Command::Show { name, config } => {
            let registry = load_registry(config.as_deref())?;
            let variant = registry.get(&name)?;
            writeln!(out, "{}", serde_json::to_string_pretty(variant)?)?;
        }
    }

    out.flush()?;
    Ok(())
}
