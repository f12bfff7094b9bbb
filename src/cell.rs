//! Raw, untyped cells as they come out of a file decoder.
//!
//! No header is assumed at this level: a [`RawBlock`] is just the grid
//! of decoded values, including any banner rows or blank padding that a
//! spreadsheet author left above the real table.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

/// A single decoded cell
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum RawCell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawCell {
    /// Returns true when the cell carries no value.
    ///
    /// Whitespace-only text and NaN numbers count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(n) => n.is_nan(),
            RawCell::Bool(_) | RawCell::DateTime(_) => false,
        }
    }

    /// String form used for column names and text columns.
    /// Returns None for empty cells.
    pub fn to_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            RawCell::Text(s) => Some(s.trim().to_string()),
            RawCell::Number(n) => Some(format_number(*n)),
            RawCell::Bool(b) => Some(b.to_string()),
            RawCell::DateTime(dt) => Some(format_datetime(dt)),
            RawCell::Empty => None,
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => write!(f, "{}", text),
            None => Ok(()),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<i64> for RawCell {
    fn from(value: i64) -> Self {
        RawCell::Number(value as f64)
    }
}

impl From<i32> for RawCell {
    fn from(value: i32) -> Self {
        RawCell::Number(value as f64)
    }
}

impl From<bool> for RawCell {
    fn from(value: bool) -> Self {
        RawCell::Bool(value)
    }
}

impl From<NaiveDateTime> for RawCell {
    fn from(value: NaiveDateTime) -> Self {
        RawCell::DateTime(value)
    }
}

impl<T: Into<RawCell>> From<Option<T>> for RawCell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawCell::Empty)
    }
}

/// Renders a number without a trailing `.0` when it is integral.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Renders a datetime as a date when it falls on midnight.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Untyped rectangular grid of cells
///
/// Ragged input rows are padded with [`RawCell::Empty`] to the widest row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawBlock {
    rows: Vec<Vec<RawCell>>,
    width: usize,
}

impl RawBlock {
    /// Builds a block from decoded rows.
    pub fn new(rows: Vec<Vec<RawCell>>) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, RawCell::Empty);
                row
            })
            .collect();
        RawBlock { rows, width }
    }

    /// Builds a block from anything convertible to cells.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<RawCell>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn rows(&self) -> &[Vec<RawCell>] {
        &self.rows
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&RawCell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn into_rows(self) -> Vec<Vec<RawCell>> {
        self.rows
    }
}

impl From<Vec<Vec<RawCell>>> for RawBlock {
    fn from(rows: Vec<Vec<RawCell>>) -> Self {
        RawBlock::new(rows)
    }
}
