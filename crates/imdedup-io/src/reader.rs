//! CSV loading for title tables

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

/// Column holding the record titles unless configured otherwise
pub const DEFAULT_TITLE_COLUMN: &str = "title";

/// Field values read as a missing title
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Row count mismatch: table has {table} rows, report has {report}")]
    RowCountMismatch { table: usize, report: usize },

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Options for reading a title table
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub title_column: String,
    /// Title values treated as missing
    pub missing_markers: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            title_column: DEFAULT_TITLE_COLUMN.to_string(),
            missing_markers: DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_title_column(mut self, column: impl Into<String>) -> Self {
        self.title_column = column.into();
        self
    }

    fn is_missing(&self, value: &str) -> bool {
        self.missing_markers.iter().any(|m| m == value)
    }
}

/// A CSV table with a designated title column.
///
/// Rows are kept as read so they can be written back unchanged.
#[derive(Debug, Clone)]
pub struct TitleTable {
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
    title_index: usize,
    titles: Vec<Option<String>>,
    delimiter: u8,
}

impl TitleTable {
    /// Open a CSV file
    pub fn read_path(path: impl AsRef<Path>, options: &CsvOptions) -> IoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let table = Self::from_reader(BufReader::new(file), options)?;

        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            "Loaded title table"
        );
        Ok(table)
    }

    /// Read a CSV table from any reader; the first row is the header.
    ///
    /// Short rows are accepted, rows wider than the header are rejected.
    pub fn from_reader<R: Read>(reader: R, options: &CsvOptions) -> IoResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .clone();

        let title_index = headers
            .iter()
            .position(|h| h.trim() == options.title_column)
            .ok_or_else(|| IoError::ColumnNotFound(options.title_column.clone()))?;

        let mut rows = Vec::new();
        let mut titles = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            // Fields past the header have no column to be written back under
            if record.len() > headers.len() {
                return Err(IoError::InvalidFormat(format!(
                    "row {} has {} fields, header has {}",
                    line + 1,
                    record.len(),
                    headers.len()
                )));
            }
            if record.len() < headers.len() {
                tracing::warn!(
                    row = line,
                    fields = record.len(),
                    expected = headers.len(),
                    "Ragged CSV row"
                );
            }

            let title = record
                .get(title_index)
                .filter(|value| !options.is_missing(value))
                .map(|value| value.to_string());
            titles.push(title);
            rows.push(record);
        }

        Ok(Self {
            headers,
            rows,
            title_index,
            titles,
            delimiter: options.delimiter,
        })
    }

    pub fn headers(&self) -> &csv::StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[csv::StringRecord] {
        &self.rows
    }

    pub fn title_index(&self) -> usize {
        self.title_index
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Title of every row, in file order; `None` for missing titles
    pub fn titles(&self) -> &[Option<String>] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &str) -> IoResult<TitleTable> {
        TitleTable::from_reader(data.as_bytes(), &CsvOptions::default())
    }

    #[test]
    fn test_read_titles() {
        let table = read("id,title,year\n1,Deep Learning,2016\n2,\"Hello, World\",2020\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.title_index(), 1);
        assert_eq!(
            table.titles(),
            &[Some("Deep Learning".to_string()), Some("Hello, World".to_string())]
        );
    }

    #[test]
    fn test_missing_markers() {
        let table = read("title\nNA\nnull\nNone\nNot missing\n").unwrap();
        assert_eq!(
            table.titles(),
            &[None, None, None, Some("Not missing".to_string())]
        );
    }

    #[test]
    fn test_empty_quoted_title_is_missing() {
        let table = read("id,title\n1,\"\"\n").unwrap();
        assert_eq!(table.titles(), &[None::<String>]);
    }

    #[test]
    fn test_column_not_found() {
        let err = read("id,name\n1,x\n").unwrap_err();
        assert!(matches!(err, IoError::ColumnNotFound(ref c) if c == "title"));
    }

    #[test]
    fn test_ragged_rows() {
        let table = read("id,year,title\n1,2020\n2,2021,Kept\n").unwrap();
        assert_eq!(table.titles(), &[None, Some("Kept".to_string())]);
    }

    #[test]
    fn test_overlong_row_rejected() {
        let err = read("id,title\n1,A\n2,B,extra_data\n").unwrap_err();
        assert!(matches!(err, IoError::InvalidFormat(_)));
        assert_eq!(
            err.to_string(),
            "Invalid format: row 2 has 3 fields, header has 2"
        );
    }

    #[test]
    fn test_custom_column_and_delimiter() {
        let options = CsvOptions::default()
            .with_delimiter(b';')
            .with_title_column("name");
        let table = TitleTable::from_reader("name;x\nA;1\n".as_bytes(), &options).unwrap();
        assert_eq!(table.titles(), &[Some("A".to_string())]);
        assert_eq!(table.delimiter(), b';');
    }

    #[test]
    fn test_file_not_found() {
        let err = TitleTable::read_path("/nonexistent/records.csv", &CsvOptions::default())
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound(_)));
    }
}
