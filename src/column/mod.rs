//! Typed columns of an ingested [`Table`](crate::table::Table).
//!
//! Every column is one explicit variant of [`ColumnData`]; callers match on
//! the tag instead of probing values at access time.

use serde::Serialize;

use crate::cell::{format_number, RawCell};

/// Enumeration identifying a column's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Numeric,
    Text,
    Empty,
}

impl ColumnType {
    /// Returns the string representation of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Empty => "empty",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column values, one variant per column type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnData {
    /// Numbers with missing entries as None
    Numeric(Vec<Option<f64>>),
    /// Opaque text with missing entries as None
    Text(Vec<Option<String>>),
    /// A column whose every data cell is missing; holds the row count
    Empty(usize),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Empty(len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Empty(_) => ColumnType::Empty,
        }
    }

    /// Returns true if the value at `row` is missing (or out of range).
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(v) => !matches!(v.get(row), Some(Some(_))),
            ColumnData::Text(v) => !matches!(v.get(row), Some(Some(_))),
            ColumnData::Empty(_) => true,
        }
    }

    /// Number of missing entries
    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Empty(len) => *len,
        }
    }

    /// Numeric view of the column, None for non-numeric columns
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Text view of the column, None for non-text columns
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    /// String form of the value at `row`.
    pub fn display_value(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(format_number),
            ColumnData::Text(v) => v.get(row).cloned().flatten(),
            ColumnData::Empty(_) => None,
        }
    }

    /// Converts the value at `row` back into a raw cell.
    pub fn raw_cell(&self, row: usize) -> RawCell {
        match self {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().into(),
            ColumnData::Text(v) => v.get(row).cloned().flatten().into(),
            ColumnData::Empty(_) => RawCell::Empty,
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column name (from the header row or synthesized)
    pub(crate) name: String,
    pub(crate) data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            data,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Present numeric values, skipping missing entries
    pub fn present_values(&self) -> Vec<f64> {
        self.data
            .as_numeric()
            .map(|v| v.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}
