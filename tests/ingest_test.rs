mod common;

use common::{e, n, sales_block, t};
use insightrs::{
    ingest, CoercionPolicy, ColumnType, Error, HeaderPolicy, IngestOptions, Ingestor, RawBlock,
};

#[test]
fn test_banner_row_is_skipped() {
    let table = ingest(&sales_block()).unwrap();

    assert_eq!(table.column_names(), vec!["Date", "Sales", "Qty"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_type("Sales").unwrap(), ColumnType::Numeric);
    assert_eq!(table.column_type("Qty").unwrap(), ColumnType::Numeric);
    assert_eq!(table.column_type("Date").unwrap(), ColumnType::Text);

    let sales = table.column("Sales").unwrap();
    assert_eq!(sales.present_values(), vec![100.0, 150.0]);
}

#[test]
fn test_empty_input_is_format_error() {
    let nothing = RawBlock::new(vec![]);
    assert!(matches!(ingest(&nothing), Err(Error::Format(_))));

    let blanks = RawBlock::new(vec![vec![e(), t("  ")], vec![e(), e()]]);
    assert!(matches!(ingest(&blanks), Err(Error::Format(_))));
}

#[test]
fn test_empty_rows_and_columns_are_dropped() {
    let block = RawBlock::new(vec![
        vec![e(), e(), e(), e()],
        vec![e(), t("Region"), e(), t("Units")],
        vec![e(), t("North"), e(), n(3.0)],
        vec![e(), e(), e(), e()],
        vec![e(), t("South"), e(), n(4.0)],
    ]);
    let table = ingest(&block).unwrap();

    assert_eq!(table.column_count(), 2);
    assert_eq!(table.column_names(), vec!["Region", "Units"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_placeholder_and_blank_names_are_synthesized() {
    let block = RawBlock::new(vec![
        vec![t("Region"), t("Unnamed: 1"), e(), t("Units")],
        vec![t("North"), n(1.0), n(2.0), n(3.0)],
    ]);
    let table = ingest(&block).unwrap();

    assert_eq!(
        table.column_names(),
        vec!["Region", "Column_1", "Column_2", "Units"]
    );
}

#[test]
fn test_numeric_header_is_rendered_without_fraction() {
    let block = RawBlock::new(vec![
        vec![t("Region"), n(2023.0), n(2024.0)],
        vec![t("North"), n(1.0), n(2.0)],
    ]);
    let table = ingest(&block).unwrap();
    assert_eq!(table.column_names(), vec!["Region", "2023", "2024"]);
}

#[test]
fn test_duplicate_names_keep_first() {
    let block = RawBlock::new(vec![
        vec![t("Sales"), t("Sales"), t("Qty")],
        vec![n(1.0), n(2.0), n(3.0)],
    ]);
    let table = ingest(&block).unwrap();

    assert_eq!(table.column_names(), vec!["Sales", "Qty"]);
    assert_eq!(table.column("Sales").unwrap().present_values(), vec![1.0]);
}

#[test]
fn test_header_only_input_gives_zero_rows() {
    let block = RawBlock::new(vec![vec![t("Region"), t("Sales")]]);
    let table = ingest(&block).unwrap();

    assert_eq!(table.column_names(), vec!["Region", "Sales"]);
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.column_type("Sales").unwrap(), ColumnType::Empty);
}

#[test]
fn test_reingesting_a_table_is_idempotent() {
    let block = RawBlock::new(vec![
        vec![t("Quarterly report"), e(), e(), e()],
        vec![e(), e(), e(), e()],
        vec![t("Region"), t("Unnamed: 1"), t("Sales"), t("Notes")],
        vec![t("North"), n(1.0), n(10.5), e()],
        vec![t("South"), e(), t("12"), e()],
        vec![e(), n(3.0), n(9.0), t("late")],
    ]);
    let first = ingest(&block).unwrap();
    let second = ingest(&first.to_raw_block()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_row_only_filled_in_dropped_duplicate_is_discarded() {
    let block = RawBlock::new(vec![
        vec![t("A"), t("B"), t("A")],
        vec![n(1.0), n(2.0), n(3.0)],
        vec![e(), e(), n(9.0)],
    ]);
    let first = ingest(&block).unwrap();

    assert_eq!(first.column_names(), vec!["A", "B"]);
    assert_eq!(first.row_count(), 1);
    assert_eq!(first.column("A").unwrap().present_values(), vec![1.0]);

    let second = ingest(&first.to_raw_block()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_names_are_unique_and_non_blank() {
    let block = RawBlock::new(vec![
        vec![e(), t("Column_0"), t("x")],
        vec![n(1.0), e(), e()],
        vec![e(), n(2.0), n(3.0)],
    ]);
    let table = ingest(&block).unwrap();

    let names = table.column_names();
    assert!(names.iter().all(|name| !name.trim().is_empty()));
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), names.len());
    assert_eq!(names, vec!["Column_0", "x"]);
}

fn exported_with_placeholder_row() -> RawBlock {
    RawBlock::new(vec![
        vec![t("Unnamed: 0"), t("Unnamed: 1"), t("Unnamed: 2")],
        vec![t("Region"), t("Sales"), t("Units")],
        vec![t("North"), n(10.0), n(3.0)],
        vec![t("South"), n(20.0), n(4.0)],
    ])
}

#[test]
fn test_most_populated_picks_placeholder_row() {
    let table = ingest(&exported_with_placeholder_row()).unwrap();

    assert_eq!(table.column_names(), vec!["Column_0", "Column_1", "Column_2"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_type("Column_1").unwrap(), ColumnType::Text);
}

#[test]
fn test_hardened_skips_placeholder_row() {
    let ingestor =
        Ingestor::new(IngestOptions::default().with_header_policy(HeaderPolicy::Hardened)).unwrap();
    let table = ingestor.ingest(&exported_with_placeholder_row()).unwrap();

    assert_eq!(table.column_names(), vec!["Region", "Sales", "Units"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_type("Sales").unwrap(), ColumnType::Numeric);
}

#[test]
fn test_both_policies_agree_on_clean_input() {
    for policy in [HeaderPolicy::MostPopulated, HeaderPolicy::Hardened] {
        let ingestor = Ingestor::new(IngestOptions::default().with_header_policy(policy)).unwrap();
        let table = ingestor.ingest(&sales_block()).unwrap();
        assert_eq!(table.column_names(), vec!["Date", "Sales", "Qty"]);
    }
}

#[test]
fn test_sparse_header_loses_to_fuller_data_row() {
    // Known limitation of the population heuristic, shared by both policies
    let block = RawBlock::new(vec![
        vec![t("Region"), t("Sales"), e()],
        vec![t("North"), n(10.0), n(3.0)],
        vec![t("South"), n(20.0), e()],
    ]);
    for policy in [HeaderPolicy::MostPopulated, HeaderPolicy::Hardened] {
        let ingestor = Ingestor::new(IngestOptions::default().with_header_policy(policy)).unwrap();
        let table = ingestor.ingest(&block).unwrap();
        assert_eq!(table.column_names(), vec!["North", "10", "3"]);
        assert_eq!(table.row_count(), 1);
    }
}

#[test]
fn test_coercion_policies_on_mixed_column() {
    let block = RawBlock::new(vec![
        vec![t("Sales")],
        vec![n(10.0)],
        vec![t(" 20 ")],
        vec![t("n/a")],
        vec![e()],
    ]);

    let strict = ingest(&block).unwrap();
    let sales = strict.column("Sales").unwrap();
    assert_eq!(sales.column_type(), ColumnType::Text);
    assert_eq!(
        sales.data().as_text().unwrap(),
        &[Some("10".to_string()), Some("20".to_string()), Some("n/a".to_string())]
    );

    let lenient = Ingestor::new(IngestOptions::default().with_coercion(CoercionPolicy::BestEffort))
        .unwrap()
        .ingest(&block)
        .unwrap();
    let sales = lenient.column("Sales").unwrap();
    assert_eq!(sales.column_type(), ColumnType::Numeric);
    assert_eq!(sales.data().as_numeric().unwrap(), &[Some(10.0), Some(20.0), None]);
}

#[test]
fn test_custom_placeholder_pattern() {
    let block = RawBlock::new(vec![
        vec![t("Region"), t("Field 2")],
        vec![t("North"), n(1.0)],
    ]);
    let ingestor =
        Ingestor::new(IngestOptions::default().with_placeholder_pattern("^Field \\d+$")).unwrap();
    let table = ingestor.ingest(&block).unwrap();
    assert_eq!(table.column_names(), vec!["Region", "Column_1"]);

    let err = Ingestor::new(IngestOptions::default().with_placeholder_pattern("(")).unwrap_err();
    assert!(matches!(err, Error::InvalidRegex(_)));
}
