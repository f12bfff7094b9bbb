use std::path::Path;

use calamine::{open_workbook_auto, DataType, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;

use crate::cell::{RawBlock, RawCell};
use crate::error::{Error, Result};
use crate::ingest::{IngestOptions, Ingestor};
use crate::table::Table;

/// Names of the sheets in a workbook, in workbook order
pub fn list_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(path.as_ref())?;
    Ok(workbook.sheet_names().to_vec())
}

/// Reads one sheet of a workbook (.xlsx, .xls, .ods) into a raw grid.
///
/// # Arguments
///
/// * `path` - Path to the workbook
/// * `sheet_name` - Sheet to read. If None, reads the first sheet
///
/// Date cells are converted from Excel serial numbers; error cells
/// become empty.
pub fn read_excel_raw<P: AsRef<Path>>(path: P, sheet_name: Option<&str>) -> Result<RawBlock> {
    let mut workbook = open_workbook_auto(path.as_ref())?;

    let sheet_name = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::Excel("workbook has no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::Excel(format!("could not read sheet '{}': {}", sheet_name, e)))?;

    // The range starts at its first used cell; restore leading blank rows
    // and columns so positions match the sheet.
    let (top, left) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<RawCell>> = vec![Vec::new(); top];
    for row in range.rows() {
        let mut cells = vec![RawCell::Empty; left];
        cells.extend(row.iter().map(to_raw_cell));
        rows.push(cells);
    }

    debug!("decoded {} rows from sheet '{}'", rows.len(), sheet_name);
    Ok(RawBlock::new(rows))
}

/// Reads and ingests one sheet of a workbook.
///
/// ```no_run
/// use insightrs::ingest::IngestOptions;
/// use insightrs::io::read_excel;
///
/// let table = read_excel("sales.xlsx", Some("2024"), &IngestOptions::default()).unwrap();
/// ```
pub fn read_excel<P: AsRef<Path>>(
    path: P,
    sheet_name: Option<&str>,
    options: &IngestOptions,
) -> Result<Table> {
    let block = read_excel_raw(path, sheet_name)?;
    Ingestor::new(options.clone())?.ingest(&block)
}

fn to_raw_cell(cell: &DataType) -> RawCell {
    match cell {
        DataType::Empty | DataType::Error(_) => RawCell::Empty,
        DataType::String(s) => RawCell::Text(s.clone()),
        DataType::Float(f) => RawCell::Number(*f),
        DataType::Int(i) => RawCell::Number(*i as f64),
        DataType::Bool(b) => RawCell::Bool(*b),
        DataType::DateTime(serial) => excel_serial_to_datetime(*serial)
            .map(RawCell::DateTime)
            .unwrap_or(RawCell::Number(*serial)),
        other => RawCell::Text(other.to_string()),
    }
}

/// Converts an Excel serial day number (1900 date system) to a datetime.
pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
