//! The immutable, typed table produced by ingestion.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use log::warn;
use serde::Serialize;

use crate::cell::{RawBlock, RawCell};
use crate::column::{Column, ColumnData, ColumnType};
use crate::error::{Error, Result};
use crate::series::Series;
use crate::temporal::parse_datetime;

/// Ordered collection of uniquely named columns of equal length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table, validating names and lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        let mut seen = HashSet::new();

        for column in &columns {
            if column.name.trim().is_empty() {
                return Err(Error::InvalidInput("column names must not be blank".into()));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate column name: {}",
                    column.name
                )));
            }
            if column.len() != row_count {
                return Err(Error::Data(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    row_count
                )));
            }
        }

        Ok(Table { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks a column up by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.get_column(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        Ok(self.column(name)?.column_type())
    }

    /// Columns holding numbers, in table order
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.column_type() == ColumnType::Numeric)
            .collect()
    }

    /// Columns holding text, in table order
    pub fn text_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.column_type() == ColumnType::Text)
            .collect()
    }

    /// Derived table containing only the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|name| self.column(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }

    /// Position-indexed numeric series for `name`.
    pub fn series(&self, name: &str) -> Result<Series> {
        let values = self.numeric_values(name)?;
        Ok(Series::new(values, Some(name.to_string())))
    }

    /// Timestamp-indexed series of `value_col` keyed by `date_col`.
    ///
    /// Rows whose date does not parse are dropped, the rest are sorted by
    /// date and values sharing a date are summed. A date whose values are
    /// all missing stays missing.
    pub fn time_series(&self, date_col: &str, value_col: &str) -> Result<Series> {
        let dates = self.column(date_col)?;
        let values = self.numeric_values(value_col)?;

        let parsed: Vec<Option<NaiveDateTime>> = match dates.data() {
            ColumnData::Text(texts) => texts
                .iter()
                .map(|t| t.as_deref().and_then(parse_datetime))
                .collect(),
            ColumnData::Empty(len) => vec![None; *len],
            ColumnData::Numeric(_) => {
                return Err(Error::ColumnType {
                    name: date_col.to_string(),
                    expected: ColumnType::Text.to_string(),
                    found: ColumnType::Numeric.to_string(),
                })
            }
        };

        let mut grouped: BTreeMap<NaiveDateTime, Option<f64>> = BTreeMap::new();
        let mut dropped = 0usize;
        for (date, value) in parsed.into_iter().zip(values) {
            let Some(date) = date else {
                dropped += 1;
                continue;
            };
            let slot = grouped.entry(date).or_insert(None);
            if let Some(v) = value {
                *slot = Some(slot.unwrap_or(0.0) + v);
            }
        }
        if dropped > 0 {
            warn!(
                "time_series: dropped {} row(s) with unparseable dates in column '{}'",
                dropped, date_col
            );
        }

        let (timestamps, values): (Vec<_>, Vec<_>) = grouped.into_iter().unzip();
        Series::with_timestamps(values, timestamps, Some(value_col.to_string()))
    }

    /// Header row followed by data rows, suitable for re-ingestion.
    pub fn to_raw_block(&self) -> RawBlock {
        let mut rows = Vec::with_capacity(self.row_count + 1);
        rows.push(
            self.columns
                .iter()
                .map(|c| RawCell::Text(c.name.clone()))
                .collect(),
        );
        for row in 0..self.row_count {
            rows.push(self.columns.iter().map(|c| c.data.raw_cell(row)).collect());
        }
        RawBlock::new(rows)
    }

    fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        match column.data() {
            ColumnData::Numeric(values) => Ok(values.clone()),
            ColumnData::Empty(len) => Ok(vec![None; *len]),
            ColumnData::Text(_) => Err(Error::ColumnType {
                name: name.to_string(),
                expected: ColumnType::Numeric.to_string(),
                found: ColumnType::Text.to_string(),
            }),
        }
    }
}
