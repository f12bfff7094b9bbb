// Statistics module
//
// Aggregates over ingested tables: grand totals, a per-column statistics
// summary, missing-value counts and the correlation matrix, plus the plain
// slice functions they are built from.

pub mod descriptive;

use serde::Serialize;

use crate::error::Result;
use crate::table::Table;

use self::descriptive::{percentile, sample_std, sorted_copy};

/// Computes basic descriptive statistics of a slice
///
/// # Example
/// ```rust
/// use insightrs::stats;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let stats = stats::describe(&data).unwrap();
/// assert_eq!(stats.count, 5);
/// assert!((stats.mean - 3.0).abs() < 1e-12);
/// ```
pub fn describe<T: AsRef<[f64]>>(data: T) -> Result<DescriptiveStats> {
    descriptive::describe_impl(data.as_ref())
}

/// Result of [`describe`]
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    pub max: f64,
}

/// Pearson correlation coefficient of two equally long slices
pub fn correlation<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> Result<f64> {
    descriptive::correlation_impl(x.as_ref(), y.as_ref())
}

/// Sample covariance of two equally long slices
pub fn covariance<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> Result<f64> {
    descriptive::covariance_impl(x.as_ref(), y.as_ref())
}

/// Sums of the numeric columns and the total of those sums
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrandTotals {
    /// (column name, sum of present values) in table order
    pub per_column: Vec<(String, f64)>,
    pub grand_total: f64,
}

impl GrandTotals {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.per_column
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| *v)
    }
}

/// Sums every numeric column and totals the sums.
pub fn grand_totals(table: &Table) -> GrandTotals {
    let per_column: Vec<(String, f64)> = table
        .numeric_columns()
        .into_iter()
        .map(|c| (c.name().to_string(), c.present_values().iter().sum()))
        .collect();
    let grand_total = per_column.iter().map(|(_, v)| v).sum();
    GrandTotals {
        per_column,
        grand_total,
    }
}

/// Statistics summary row for one numeric column
///
/// Values undefined for the number of present observations are None.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    /// Sample standard deviation
    pub dev: Option<f64>,
}

/// Count, mean, median, max, min and deviation of every numeric column.
///
/// Returns an empty vector when the table has no numeric column.
pub fn summarize(table: &Table) -> Vec<ColumnSummary> {
    table
        .numeric_columns()
        .into_iter()
        .map(|column| {
            let values = column.present_values();
            let count = values.len();
            if count == 0 {
                return ColumnSummary {
                    name: column.name().to_string(),
                    count,
                    mean: None,
                    median: None,
                    max: None,
                    min: None,
                    dev: None,
                };
            }
            let mean = values.iter().sum::<f64>() / count as f64;
            let sorted = sorted_copy(&values);
            ColumnSummary {
                name: column.name().to_string(),
                count,
                mean: Some(mean),
                median: Some(percentile(&sorted, 0.5)),
                max: sorted.last().copied(),
                min: sorted.first().copied(),
                dev: sample_std(&values, mean),
            }
        })
        .collect()
}

/// Missing-value count per column, omitting complete columns.
pub fn missing_values(table: &Table) -> Vec<(String, usize)> {
    table
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.data().missing_count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Square matrix of pairwise Pearson correlations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]`, None where the coefficient is undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Off-diagonal pair with the largest absolute coefficient, first pair
    /// winning ties.
    pub fn strongest_pair(&self) -> Option<(&str, &str, f64)> {
        let mut best: Option<(&str, &str, f64)> = None;
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                if let Some(r) = self.values[i][j] {
                    if best.map(|(_, _, b)| r.abs() > b.abs()).unwrap_or(true) {
                        best = Some((self.columns[i].as_str(), self.columns[j].as_str(), r));
                    }
                }
            }
        }
        best
    }
}

/// Correlation matrix over the numeric columns using pairwise-complete rows.
///
/// Returns None when the table has fewer than two numeric columns.
pub fn correlation_matrix(table: &Table) -> Option<CorrelationMatrix> {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return None;
    }

    let data: Vec<&[Option<f64>]> = numeric
        .iter()
        .filter_map(|c| c.data().as_numeric())
        .collect();
    let k = data.len();
    let mut values = vec![vec![None; k]; k];
    for i in 0..k {
        for j in i..k {
            let (x, y): (Vec<f64>, Vec<f64>) = data[i]
                .iter()
                .zip(data[j].iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = correlation(&x, &y).ok();
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        values,
    })
}
