//! Marked CSV output
//!
//! Writes the original table back with the two classification columns, every
//! field quoted.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use imdedup_core::{Classification, DeduplicationReport};

use crate::reader::{IoError, IoResult, TitleTable};

pub const HIGH_CONFIDENCE_COLUMN: &str = "high_confidence_duplicate";
pub const POTENTIAL_COLUMN: &str = "potential_duplicate";

fn format_flag(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Position of a flag column: reuse an existing column of that name,
/// otherwise append one.
fn flag_column(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(index) => index,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

/// Write the table with classification columns to any writer
pub fn write_marked_csv<W: Write>(
    writer: W,
    table: &TitleTable,
    report: &DeduplicationReport,
) -> IoResult<()> {
    if table.len() != report.len() {
        return Err(IoError::RowCountMismatch {
            table: table.len(),
            report: report.len(),
        });
    }

    let mut headers: Vec<String> = table.headers().iter().map(|h| h.to_string()).collect();
    let high_index = flag_column(&mut headers, HIGH_CONFIDENCE_COLUMN);
    let potential_index = flag_column(&mut headers, POTENTIAL_COLUMN);

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(table.delimiter())
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    csv_writer
        .write_record(&headers)
        .map_err(|e| IoError::Io(e.to_string()))?;

    for (row, classification) in table.rows().iter().zip(&report.classifications) {
        let fields = marked_fields(row, headers.len(), high_index, potential_index, classification);
        csv_writer
            .write_record(&fields)
            .map_err(|e| IoError::Io(e.to_string()))?;
    }

    csv_writer.flush().map_err(|e| IoError::Io(e.to_string()))
}

fn marked_fields<'a>(
    row: &'a csv::StringRecord,
    width: usize,
    high_index: usize,
    potential_index: usize,
    classification: &Classification,
) -> Vec<&'a str> {
    // Rows are never wider than the header; short ones are padded to it
    let mut fields: Vec<&str> = row.iter().collect();
    fields.resize(width, "");
    fields[high_index] = format_flag(classification.high_confidence_duplicate);
    fields[potential_index] = format_flag(classification.potential_duplicate);
    fields
}

/// Write the marked table to a file, replacing it if present
pub fn write_marked_csv_path(
    path: impl AsRef<Path>,
    table: &TitleTable,
    report: &DeduplicationReport,
) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    write_marked_csv(BufWriter::new(file), table, report)?;

    tracing::debug!(path = %path.display(), rows = table.len(), "Wrote marked table");
    Ok(())
}
