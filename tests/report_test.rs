mod common;

use std::fs;

use chrono::NaiveDate;
use common::{e, n, t, TempTestFile};
use insightrs::report::{summary_sheets, write_summary_csv, HtmlReport, DEFAULT_TITLE};
use insightrs::{generate_insights, ingest, Column, ColumnType, Insight, RawBlock, Table};

fn sales() -> Table {
    ingest(&RawBlock::new(vec![
        vec![t("Region"), t("Sales"), t("Units")],
        vec![t("North"), n(10.0), n(1.0)],
        vec![t("South"), n(20.0), e()],
        vec![t("North"), n(30.0), n(3.0)],
    ]))
    .unwrap()
}

#[test]
fn test_html_report_lists_shape_and_insights() {
    let table = sales();
    let insights = generate_insights(&table);
    let generated = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();

    let html = HtmlReport::new(&table, &insights)
        .generated_at(generated)
        .to_html();

    assert!(html.starts_with("<html><head><meta charset=\"utf-8\"><title>Report</title>"));
    assert!(html.contains("<h1>Sales Insights &amp; Forecasting</h1>"));
    assert!(html.contains("<p>Generated: 2024-05-01 09:30:00</p>"));
    assert!(html.contains("<h2>Dataset</h2><p>Rows: 3 | Columns: 3</p>"));
    assert!(html.contains("<li>Missing values exist in: Units</li>"));
    assert_eq!(html.matches("<li>").count(), insights.len());
    assert!(html.ends_with("</ul></body></html>"));
    assert_eq!(DEFAULT_TITLE, "Sales Insights & Forecasting");
}

#[test]
fn test_html_report_escapes_markup() {
    let table = Table::new(vec![Column::text("<b>", vec![Some("x".into())])]).unwrap();
    let insights = vec![Insight::TopValues {
        column: "<b>".to_string(),
        values: vec!["a&b".to_string()],
    }];

    let html = HtmlReport::new(&table, &insights)
        .title("Q1 <draft>")
        .to_html();

    assert!(html.contains("<h1>Q1 &lt;draft&gt;</h1>"));
    assert!(html.contains("<li>Top values for &lt;b&gt;: a&amp;b</li>"));
    assert!(!html.contains("<b>"));
}

#[test]
fn test_summary_sheets_hold_raw_and_stats() {
    let table = sales();
    let sheets = summary_sheets(&table).unwrap();

    let names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Raw", "Stats"]);
    assert_eq!(sheets[0].1, table);

    let stats = &sheets[1].1;
    assert_eq!(
        stats.column_names(),
        vec!["Column", "count", "mean", "median", "max", "min", "std"]
    );
    assert_eq!(stats.row_count(), 2);
    assert_eq!(stats.column_type("Column").unwrap(), ColumnType::Text);
    assert_eq!(stats.column("count").unwrap().present_values(), vec![3.0, 2.0]);
    assert_eq!(stats.column("mean").unwrap().present_values(), vec![20.0, 2.0]);
    assert_eq!(stats.column("max").unwrap().present_values(), vec![30.0, 3.0]);
}

#[test]
fn test_stats_sheet_is_empty_without_numeric_columns() {
    let table = Table::new(vec![Column::text("Region", vec![Some("North".into())])]).unwrap();
    let sheets = summary_sheets(&table).unwrap();

    assert_eq!(sheets[1].1.column_count(), 0);
    assert_eq!(sheets[1].1.row_count(), 0);
}

#[test]
fn test_write_summary_csv_writes_one_file_per_sheet() {
    let anchor = TempTestFile::new("summary", "csv");
    let dir = anchor.path().parent().unwrap();

    let paths = write_summary_csv(&sales(), dir).unwrap();

    assert_eq!(paths, vec![dir.join("Raw.csv"), dir.join("Stats.csv")]);
    let raw = fs::read_to_string(&paths[0]).unwrap();
    assert!(raw.starts_with("Region,Sales,Units\n"));
    let stats = fs::read_to_string(&paths[1]).unwrap();
    assert!(stats.starts_with("Column,count,mean,median,max,min,std\n"));
    assert_eq!(stats.lines().count(), 3);
}
