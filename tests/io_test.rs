mod common;

use std::fs;

use common::TempTestFile;
use insightrs::io::{read_csv, read_csv_raw, to_json_value, write_csv, write_json, JsonOrient};
use insightrs::{CoercionPolicy, ColumnType, Error, IngestOptions, RawCell};

const REPORT: &str = "\
Monthly sales report,,,
,,,
Month,Region,Sales,Unnamed: 3
2024-01,North,100,
2024-02,South,150.5,x
2024-03,North,,
";

#[test]
fn test_read_csv_detects_header_below_banner() {
    let file = TempTestFile::with_content("report", "csv", REPORT);
    let table = read_csv(file.path(), &IngestOptions::default()).unwrap();

    assert_eq!(table.column_names(), vec!["Month", "Region", "Sales", "Column_3"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_type("Sales").unwrap(), ColumnType::Numeric);
    assert_eq!(
        table.column("Sales").unwrap().data().as_numeric().unwrap(),
        &[Some(100.0), Some(150.5), None]
    );
}

#[test]
fn test_read_csv_raw_keeps_every_row() {
    let file = TempTestFile::with_content("raw", "csv", REPORT);
    let block = read_csv_raw(file.path()).unwrap();

    assert_eq!(block.row_count(), 6);
    assert_eq!(block.column_count(), 4);
    assert_eq!(block.get(0, 0), Some(&RawCell::Text("Monthly sales report".into())));
    assert_eq!(block.get(1, 0), Some(&RawCell::Empty));
}

#[test]
fn test_csv_round_trip() {
    let source = TempTestFile::with_content("source", "csv", REPORT);
    let table = read_csv(source.path(), &IngestOptions::default()).unwrap();

    let target = TempTestFile::new("target", "csv");
    write_csv(&table, target.path()).unwrap();

    let written = fs::read_to_string(target.path()).unwrap();
    assert!(written.starts_with("Month,Region,Sales,Column_3\n2024-01,North,100,\n"));

    let reread = read_csv(target.path(), &IngestOptions::default()).unwrap();
    assert_eq!(reread, table);
}

#[test]
fn test_read_csv_with_best_effort_coercion() {
    let file = TempTestFile::with_content("mixed", "csv", "id,amount\n1,10\n2,oops\n3,30\n");
    let options = IngestOptions::default().with_coercion(CoercionPolicy::BestEffort);
    let table = read_csv(file.path(), &options).unwrap();

    assert_eq!(
        table.column("amount").unwrap().data().as_numeric().unwrap(),
        &[Some(10.0), None, Some(30.0)]
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let file = TempTestFile::new("absent", "csv");
    let err = read_csv_raw(file.path()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_empty_csv_is_format_error() {
    let file = TempTestFile::with_content("empty", "csv", ",,\n,,\n");
    let err = read_csv(file.path(), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Format(_)));
}

#[test]
fn test_write_json_records() {
    let source = TempTestFile::with_content("json_source", "csv", REPORT);
    let table = read_csv(source.path(), &IngestOptions::default()).unwrap();

    let target = TempTestFile::new("records", "json");
    write_json(&table, target.path(), JsonOrient::Records).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(target.path()).unwrap()).unwrap();
    assert_eq!(parsed, to_json_value(&table, JsonOrient::Records));
    assert_eq!(parsed[1]["Sales"], 150.5);
    assert_eq!(parsed[2]["Sales"], serde_json::Value::Null);
}
