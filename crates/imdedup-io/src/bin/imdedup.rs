//! imdedup CLI
//!
//! Flags exact and fuzzy duplicate titles in a CSV file.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use imdedup_core::{DeduplicationConfig, Deduplicator, MissingTitlePolicy};
use imdedup_io::{deduplicate_csv, default_output_path, CsvOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MissingTitles {
    /// Missing titles match each other
    Placeholder,
    /// Missing titles never match
    Empty,
}

impl From<MissingTitles> for MissingTitlePolicy {
    fn from(value: MissingTitles) -> Self {
        match value {
            MissingTitles::Placeholder => MissingTitlePolicy::Placeholder,
            MissingTitles::Empty => MissingTitlePolicy::Empty,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "imdedup", version, about = "Flag duplicate titles in a CSV file")]
struct Cli {
    /// Input CSV file
    input: PathBuf,

    /// Output CSV file [default: <input stem>_duplicates_marked.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the title column
    #[arg(long, default_value = imdedup_io::DEFAULT_TITLE_COLUMN)]
    title_column: String,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum similarity ratio for potential duplicates, in (0, 1]
    #[arg(long)]
    threshold: Option<f64>,

    /// Maximum relative title length difference compared, in [0, 1]
    #[arg(long)]
    length_cutoff: Option<f64>,

    /// How records without a title are matched
    #[arg(long, value_enum)]
    missing_titles: Option<MissingTitles>,

    /// Strip diacritics before comparing titles
    #[arg(long)]
    fold_diacritics: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(path: &Path) -> Result<DeduplicationConfig, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DeduplicationConfig::from_json(&content)?,
        _ => DeduplicationConfig::from_toml(&content)?,
    };
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DeduplicationConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(cutoff) = cli.length_cutoff {
        config.length_ratio_cutoff = cutoff;
    }
    if let Some(missing) = cli.missing_titles {
        config.missing_titles = missing.into();
    }
    if cli.fold_diacritics {
        config.fold_diacritics = true;
    }

    // Reject bad thresholds before touching the input
    let deduplicator = Deduplicator::new(config)?;

    if !cli.delimiter.is_ascii() {
        return Err(format!("Delimiter must be a single ASCII character: {:?}", cli.delimiter).into());
    }
    let options = CsvOptions::default()
        .with_delimiter(cli.delimiter as u8)
        .with_title_column(cli.title_column);

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input));

    let report = deduplicate_csv(&cli.input, &output, &options, &deduplicator)?;
    let summary = report.summary();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("High confidence duplicates: {}", summary.high_confidence_duplicates);
        println!("Potential duplicates: {}", summary.potential_duplicates);
        println!("Saved to {}", output.display());
    }

    Ok(())
}
