//! Tabular ingestion: turns an arbitrary decoded grid into a clean [`Table`].
//!
//! Uploaded spreadsheets rarely start with their header on row 0. Banner
//! rows, blank padding and stray notes are common, so ingestion runs in
//! a fixed sequence:
//!
//! 1. drop rows and columns that are entirely empty
//! 2. locate the header row ([`HeaderPolicy`])
//! 3. name columns from the header, synthesizing `Column_<i>` for blank or
//!    placeholder names
//! 4. keep only the first of any duplicated column name
//! 5. keep the rows below the header that have a value in a kept column
//! 6. type every column ([`CoercionPolicy`])
//!
//! # Example
//!
//! ```rust
//! use insightrs::cell::{RawBlock, RawCell};
//! use insightrs::ingest::ingest;
//!
//! let block = RawBlock::from_rows(vec![
//!     vec![RawCell::Empty, RawCell::Empty],
//!     vec![RawCell::from("Region"), RawCell::from("Sales")],
//!     vec![RawCell::from("North"), RawCell::from(120.0)],
//! ]);
//! let table = ingest(&block).unwrap();
//! assert_eq!(table.column_names(), vec!["Region", "Sales"]);
//! assert_eq!(table.row_count(), 1);
//! ```

mod coerce;
mod header;

use std::collections::HashSet;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cell::{RawBlock, RawCell};
use crate::column::Column;
use crate::error::{Error, Result};
use crate::table::Table;

pub use self::coerce::CoercionPolicy;
pub use self::header::HeaderPolicy;

/// Placeholder names emitted by spreadsheet exporters for unnamed columns
pub const DEFAULT_PLACEHOLDER_PATTERN: &str = "^Unnamed";

/// Prefix of synthesized column names
pub const SYNTHETIC_COLUMN_PREFIX: &str = "Column_";

lazy_static! {
    static ref DEFAULT_PLACEHOLDER: Regex =
        Regex::new(DEFAULT_PLACEHOLDER_PATTERN).expect("default placeholder pattern is valid");
}

/// Ingestion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    pub header_policy: HeaderPolicy,
    pub coercion: CoercionPolicy,
    /// Regular expression for placeholder header names; empty disables it
    pub placeholder_pattern: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            header_policy: HeaderPolicy::default(),
            coercion: CoercionPolicy::default(),
            placeholder_pattern: DEFAULT_PLACEHOLDER_PATTERN.to_string(),
        }
    }
}

impl IngestOptions {
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    pub fn with_coercion(mut self, policy: CoercionPolicy) -> Self {
        self.coercion = policy;
        self
    }

    pub fn with_placeholder_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.placeholder_pattern = pattern.into();
        self
    }
}

/// Stateless ingestor bound to one set of options
#[derive(Debug, Clone)]
pub struct Ingestor {
    options: IngestOptions,
    placeholder: Option<Regex>,
}

impl Default for Ingestor {
    fn default() -> Self {
        Ingestor {
            options: IngestOptions::default(),
            placeholder: Some(DEFAULT_PLACEHOLDER.clone()),
        }
    }
}

impl Ingestor {
    /// Creates an ingestor, compiling the placeholder pattern.
    pub fn new(options: IngestOptions) -> Result<Self> {
        let placeholder = match options.placeholder_pattern.as_str() {
            "" => None,
            DEFAULT_PLACEHOLDER_PATTERN => Some(DEFAULT_PLACEHOLDER.clone()),
            pattern => Some(Regex::new(pattern)?),
        };
        Ok(Ingestor {
            options,
            placeholder,
        })
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Turns a raw grid into a typed table.
    ///
    /// Fails with [`Error::Format`] when no non-empty cell exists.
    pub fn ingest(&self, block: &RawBlock) -> Result<Table> {
        let width = block.column_count();

        let kept_columns: Vec<usize> = (0..width)
            .filter(|&c| block.rows().iter().any(|row| !row[c].is_empty()))
            .collect();
        let grid: Vec<Vec<&RawCell>> = block
            .rows()
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|row| kept_columns.iter().map(|&c| &row[c]).collect())
            .collect();

        if grid.is_empty() || kept_columns.is_empty() {
            return Err(Error::Format(
                "no usable rows or columns found in the uploaded data".into(),
            ));
        }
        debug!(
            "ingest: {}x{} grid cleaned to {}x{}",
            block.row_count(),
            width,
            grid.len(),
            kept_columns.len()
        );

        let header_idx =
            header::detect_header_row(&grid, self.options.header_policy, self.placeholder.as_ref());

        let names: Vec<String> = grid[header_idx]
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if header::is_placeholder(cell, self.placeholder.as_ref()) {
                    format!("{}{}", SYNTHETIC_COLUMN_PREFIX, i)
                } else {
                    cell.to_text().unwrap_or_default()
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let mut named: Vec<(usize, String)> = Vec::with_capacity(names.len());
        for (i, name) in names.into_iter().enumerate() {
            if seen.insert(name.clone()) {
                named.push((i, name));
            } else {
                debug!("ingest: dropping duplicate column '{}' at position {}", name, i);
            }
        }

        // A row survives only if one of the kept columns has a value in it.
        let data_rows: Vec<&Vec<&RawCell>> = grid[header_idx + 1..]
            .iter()
            .filter(|row| named.iter().any(|(i, _)| !row[*i].is_empty()))
            .collect();

        let mut columns = Vec::with_capacity(named.len());
        for (i, name) in named {
            let cells: Vec<&RawCell> = data_rows.iter().map(|row| row[i]).collect();
            let data = coerce::coerce_column(&cells, self.options.coercion);
            debug!("ingest: column '{}' typed as {}", name, data.column_type());
            columns.push(Column::new(name, data));
        }

        Table::new(columns)
    }
}

/// Ingests `block` with default options.
pub fn ingest(block: &RawBlock) -> Result<Table> {
    Ingestor::default().ingest(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_disables_placeholders() {
        let ingestor = Ingestor::new(IngestOptions::default().with_placeholder_pattern("")).unwrap();
        let block = RawBlock::from_rows(vec![vec!["Unnamed: 0", "Sales"], vec!["a", "1"]]);
        let table = ingestor.ingest(&block).unwrap();
        assert_eq!(table.column_names(), vec!["Unnamed: 0", "Sales"]);
    }

    #[test]
    fn test_default_ingestor_matches_default_options() {
        let ingestor = Ingestor::default();
        assert_eq!(ingestor.options(), &IngestOptions::default());
        assert!(ingestor.placeholder.is_some());
    }
}
