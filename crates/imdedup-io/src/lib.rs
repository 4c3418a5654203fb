//! imdedup-io - Tabular I/O for imdedup
//!
//! Loads a CSV file with a title column, hands the titles to the
//! [`imdedup_core`] engine, and writes the table back with two extra columns:
//! `high_confidence_duplicate` and `potential_duplicate`.
//!
//! The `imdedup` binary (feature `cli`) wraps [`deduplicate_csv`].

pub mod reader;
pub mod writer;

use std::path::Path;

use imdedup_core::{DeduplicationReport, Deduplicator};

pub use reader::{
    CsvOptions, IoError, IoResult, TitleTable, DEFAULT_MISSING_MARKERS, DEFAULT_TITLE_COLUMN,
};
pub use writer::{
    write_marked_csv, write_marked_csv_path, HIGH_CONFIDENCE_COLUMN, POTENTIAL_COLUMN,
};

/// Read `input`, classify its titles and write the marked table to `output`
pub fn deduplicate_csv(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &CsvOptions,
    deduplicator: &Deduplicator,
) -> IoResult<DeduplicationReport> {
    let table = TitleTable::read_path(input, options)?;
    let report = deduplicator.classify(table.titles());
    write_marked_csv_path(output, &table, &report)?;
    Ok(report)
}

/// Default output path: `<stem>_duplicates_marked.csv` next to the input
pub fn default_output_path(input: &Path) -> std::path::PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_string());
    input.with_file_name(format!("{stem}_duplicates_marked.csv"))
}
