//! End-to-end tests for the CSV pipeline

use std::fs;

use imdedup_core::{DeduplicationConfig, Deduplicator, MissingTitlePolicy};
use imdedup_io::{
    deduplicate_csv, default_output_path, CsvOptions, IoError, TitleTable,
    HIGH_CONFIDENCE_COLUMN, POTENTIAL_COLUMN,
};
use tempfile::TempDir;

const RECORDS: &str = "\
id,title,year
1,Deep Learning,2016
2,deep learning!,2016
3,\"Deep   Learning\",2017
4,War and Peace,1869
5,War & Peace,1869
6,Introduction to Algorithms,2009
7,Introduction to Algorithm,2009
8,,2020
9,NA,2021
";

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn flags(table: &TitleTable) -> Vec<(String, String)> {
    let headers = table.headers();
    let high = headers.iter().position(|h| h == HIGH_CONFIDENCE_COLUMN).unwrap();
    let potential = headers.iter().position(|h| h == POTENTIAL_COLUMN).unwrap();
    table
        .rows()
        .iter()
        .map(|row| (row[high].to_string(), row[potential].to_string()))
        .collect()
}

fn pair(high: &str, potential: &str) -> (String, String) {
    (high.to_string(), potential.to_string())
}

// === Default pipeline ===

#[test]
fn test_marks_default_records() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "records.csv", RECORDS);
    let output = default_output_path(&input);

    let report = deduplicate_csv(
        &input,
        &output,
        &CsvOptions::default(),
        &Deduplicator::default(),
    )
    .unwrap();

    let summary = report.summary();
    assert_eq!(summary.total_records, 9);
    // Three "deep learning" rows plus the two missing titles
    assert_eq!(summary.high_confidence_duplicates, 5);
    assert_eq!(summary.potential_duplicates, 2);

    let written = TitleTable::read_path(&output, &CsvOptions::default()).unwrap();
    assert_eq!(written.len(), 9);
    assert_eq!(
        flags(&written),
        vec![
            pair("True", "False"),
            pair("True", "False"),
            pair("True", "False"),
            pair("False", "False"),
            pair("False", "False"),
            pair("False", "True"),
            pair("False", "True"),
            pair("True", "False"),
            pair("True", "False"),
        ]
    );
}

#[test]
fn test_output_keeps_original_fields_quoted() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "records.csv", "title,note\n\"A, B\",x\nC,\n");
    let output = dir.path().join("out.csv");

    deduplicate_csv(
        &input,
        &output,
        &CsvOptions::default(),
        &Deduplicator::default(),
    )
    .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "\"title\",\"note\",\"high_confidence_duplicate\",\"potential_duplicate\"\n\
         \"A, B\",\"x\",\"False\",\"False\"\n\
         \"C\",\"\",\"False\",\"False\"\n"
    );
}

// === Configuration ===

#[test]
fn test_empty_policy_leaves_missing_titles_unflagged() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "records.csv", RECORDS);
    let output = dir.path().join("out.csv");

    let config = DeduplicationConfig::default().with_missing_titles(MissingTitlePolicy::Empty);
    let report = deduplicate_csv(
        &input,
        &output,
        &CsvOptions::default(),
        &Deduplicator::new(config).unwrap(),
    )
    .unwrap();

    assert_eq!(report.summary().high_confidence_duplicates, 3);
    let written = TitleTable::read_path(&output, &CsvOptions::default()).unwrap();
    let marks = flags(&written);
    assert_eq!(marks[7], pair("False", "False"));
    assert_eq!(marks[8], pair("False", "False"));
}

#[test]
fn test_semicolon_delimiter_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "records.csv", "name;year\nAlpha;1\nalpha;2\n");
    let output = dir.path().join("out.csv");
    let options = CsvOptions::default()
        .with_delimiter(b';')
        .with_title_column("name");

    deduplicate_csv(&input, &output, &options, &Deduplicator::default()).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with(
        "\"name\";\"year\";\"high_confidence_duplicate\";\"potential_duplicate\"\n"
    ));
    let written = TitleTable::read_path(&output, &options).unwrap();
    assert_eq!(
        flags(&written),
        vec![pair("True", "False"), pair("True", "False")]
    );
}

// === Errors ===

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let err = deduplicate_csv(
        dir.path().join("absent.csv"),
        dir.path().join("out.csv"),
        &CsvOptions::default(),
        &Deduplicator::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::FileNotFound(_)));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_overlong_row_is_rejected_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "records.csv", "id,title\n1,A,extra_data\n");
    let output = dir.path().join("out.csv");
    let err = deduplicate_csv(
        &input,
        &output,
        &CsvOptions::default(),
        &Deduplicator::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::InvalidFormat(_)));
    assert!(!output.exists());
}

#[test]
fn test_missing_title_column() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "records.csv", "id,name\n1,x\n");
    let err = deduplicate_csv(
        &input,
        dir.path().join("out.csv"),
        &CsvOptions::default(),
        &Deduplicator::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Column not found: title");
}
