use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, Result};

/// Index paired with the values of a [`Series`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SeriesIndex {
    /// Implicit sequence positions 0..len
    Positions,
    /// One timestamp per value
    Timestamps(Vec<NaiveDateTime>),
}

/// Series structure: a named numeric column with an optional timestamp index
///
/// Index and values always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Data values, missing entries as None
    values: Vec<Option<f64>>,

    /// Index labels
    index: SeriesIndex,

    /// Name (optional)
    name: Option<String>,
}

impl Series {
    /// Create a position-indexed series
    pub fn new(values: Vec<Option<f64>>, name: Option<String>) -> Self {
        Series {
            values,
            index: SeriesIndex::Positions,
            name,
        }
    }

    /// Create a series from plain values with no missing entries
    pub fn from_values(values: Vec<f64>, name: Option<String>) -> Self {
        Self::new(values.into_iter().map(Some).collect(), name)
    }

    /// Create a timestamp-indexed series
    ///
    /// Fails with [`Error::Data`] when the lengths differ.
    pub fn with_timestamps(
        values: Vec<Option<f64>>,
        timestamps: Vec<NaiveDateTime>,
        name: Option<String>,
    ) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(Error::Data(format!(
                "value length ({}) and index length ({}) differ",
                values.len(),
                timestamps.len()
            )));
        }

        Ok(Series {
            values,
            index: SeriesIndex::Timestamps(timestamps),
            name,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Timestamps, if the series is time indexed
    pub fn timestamps(&self) -> Option<&[NaiveDateTime]> {
        match &self.index {
            SeriesIndex::Timestamps(ts) => Some(ts),
            SeriesIndex::Positions => None,
        }
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Number of observations that are neither missing nor NaN
    pub fn valid_count(&self) -> usize {
        self.values
            .iter()
            .filter(|v| matches!(v, Some(x) if !x.is_nan()))
            .count()
    }

    /// Drops missing observations, keeping the index aligned.
    pub fn dropna(&self) -> Series {
        let keep: Vec<bool> = self
            .values
            .iter()
            .map(|v| matches!(v, Some(x) if !x.is_nan()))
            .collect();
        let values = self
            .values
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(v, _)| *v)
            .collect();
        let index = match &self.index {
            SeriesIndex::Positions => SeriesIndex::Positions,
            SeriesIndex::Timestamps(ts) => SeriesIndex::Timestamps(
                ts.iter()
                    .zip(&keep)
                    .filter(|(_, k)| **k)
                    .map(|(t, _)| *t)
                    .collect(),
            ),
        };
        Series {
            values,
            index,
            name: self.name.clone(),
        }
    }
}
