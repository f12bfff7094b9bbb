//! Plain-language observations about an ingested table.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::stats::{correlation_matrix, missing_values};
use crate::table::Table;

/// Number of text columns inspected for frequent values
pub const TOP_VALUE_COLUMNS: usize = 3;
/// Number of frequent values reported per text column
pub const TOP_VALUE_COUNT: usize = 3;

/// A single generated observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Insight {
    /// Columns containing at least one missing value, in table order
    MissingValues(Vec<String>),
    NoMissingValues,
    Shape { rows: usize, columns: usize },
    /// Most frequent values of a text column, most frequent first
    TopValues { column: String, values: Vec<String> },
    /// Strongest off-diagonal correlation between numeric columns.
    ///
    /// Pairs are ranked by `|coefficient|`, but the stored and displayed
    /// coefficient keeps its sign, so a strong inverse relation reads `-0.98`.
    Correlation {
        first: String,
        second: String,
        coefficient: f64,
    },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::MissingValues(columns) => {
                write!(f, "Missing values exist in: {}", columns.join(", "))
            }
            Insight::NoMissingValues => write!(f, "No missing values detected"),
            Insight::Shape { rows, columns } => write!(f, "Rows: {}, Columns: {}", rows, columns),
            Insight::TopValues { column, values } => {
                write!(f, "Top values for {}: {}", column, values.join(", "))
            }
            Insight::Correlation {
                first,
                second,
                coefficient,
            } => write!(
                f,
                "Correlation between {} and {}: {:.2}",
                first, second, coefficient
            ),
        }
    }
}

/// Generates the insight list for a table.
///
/// Order: missing values, shape, top values of the first text columns,
/// strongest correlation.
///
/// # Example
/// ```rust
/// use insightrs::{generate_insights, Column, Insight, Table};
///
/// let table = Table::new(vec![Column::numeric("x", vec![Some(1.0), Some(2.0)])]).unwrap();
/// let insights = generate_insights(&table);
/// assert_eq!(insights[0], Insight::NoMissingValues);
/// assert_eq!(insights[1].to_string(), "Rows: 2, Columns: 1");
/// ```
pub fn generate_insights(table: &Table) -> Vec<Insight> {
    let mut insights = Vec::new();

    let missing = missing_values(table);
    if missing.is_empty() {
        insights.push(Insight::NoMissingValues);
    } else {
        insights.push(Insight::MissingValues(
            missing.into_iter().map(|(name, _)| name).collect(),
        ));
    }

    insights.push(Insight::Shape {
        rows: table.row_count(),
        columns: table.column_count(),
    });

    for column in table.text_columns().into_iter().take(TOP_VALUE_COLUMNS) {
        if let Some(values) = column.data().as_text() {
            insights.push(Insight::TopValues {
                column: column.name().to_string(),
                values: top_values(values, TOP_VALUE_COUNT),
            });
        }
    }

    if let Some(matrix) = correlation_matrix(table) {
        if let Some((first, second, coefficient)) = matrix.strongest_pair() {
            insights.push(Insight::Correlation {
                first: first.to_string(),
                second: second.to_string(),
                coefficient,
            });
        }
    }

    insights
}

/// Most frequent present values; ties keep first-appearance order.
fn top_values(values: &[Option<String>], n: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        if let Some(value) = value {
            counts.entry(value.as_str()).or_insert((0, position)).0 += 1;
        }
    }

    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(n)
        .map(|(value, _)| value.to_string())
        .collect()
}
