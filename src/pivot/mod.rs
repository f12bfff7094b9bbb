//! Module providing pivot table functionality

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnData, ColumnType};
use crate::error::{Error, Result};
use crate::stats::descriptive::{percentile, sample_std, sorted_copy};
use crate::table::Table;

/// Label used for the margin row and column
pub const MARGIN_LABEL: &str = "All";

/// Types of aggregation functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunction {
    /// Sum
    #[default]
    Sum,
    /// Mean
    Mean,
    /// Median
    Median,
    /// Count of present values
    Count,
    /// Minimum
    Min,
    /// Maximum
    Max,
    /// Sample standard deviation
    Std,
}

impl AggFunction {
    /// Get function name as string
    pub fn name(&self) -> &'static str {
        match self {
            AggFunction::Sum => "sum",
            AggFunction::Mean => "mean",
            AggFunction::Median => "median",
            AggFunction::Count => "count",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Std => "std",
        }
    }

    /// Aggregates the present values of a group.
    ///
    /// Sum of an empty group is 0; the other statistics are undefined
    /// and return None. Standard deviation needs two values.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            AggFunction::Sum => Some(values.iter().sum()),
            AggFunction::Count => Some(values.len() as f64),
            _ if values.is_empty() => None,
            AggFunction::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            AggFunction::Median => Some(percentile(&sorted_copy(values), 0.5)),
            AggFunction::Min => values.iter().copied().reduce(f64::min),
            AggFunction::Max => values.iter().copied().reduce(f64::max),
            AggFunction::Std => {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                sample_std(values, mean)
            }
        }
    }
}

impl FromStr for AggFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(AggFunction::Sum),
            "mean" | "avg" | "average" => Ok(AggFunction::Mean),
            "median" => Ok(AggFunction::Median),
            "count" => Ok(AggFunction::Count),
            "min" | "minimum" => Ok(AggFunction::Min),
            "max" | "maximum" => Ok(AggFunction::Max),
            "std" | "stddev" => Ok(AggFunction::Std),
            other => Err(Error::InvalidInput(format!(
                "unknown aggregation function: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AggFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What to pivot: key fields, value field and aggregation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotSpec {
    /// Columns whose values become the result rows
    pub rows: Vec<String>,
    /// Columns whose values become the result columns
    pub columns: Vec<String>,
    /// Column to aggregate; every numeric non-key column when None
    pub values: Option<String>,
    pub aggfunc: AggFunction,
    /// Append an `All` row and column
    pub margins: bool,
}

impl PivotSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows = rows.into_iter().map(Into::into).collect();
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn values(mut self, values: impl Into<String>) -> Self {
        self.values = Some(values.into());
        self
    }

    pub fn aggfunc(mut self, aggfunc: AggFunction) -> Self {
        self.aggfunc = aggfunc;
        self
    }

    pub fn margins(mut self, margins: bool) -> Self {
        self.margins = margins;
        self
    }
}

/// One component of a group key
///
/// Numeric key columns order by value, text key columns by label.
#[derive(Debug, Clone)]
struct KeyPart {
    label: String,
    number: Option<f64>,
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => self.label.cmp(&other.label),
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyPart {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyPart {}

type GroupKey = Vec<KeyPart>;

/// Structure for creating pivot tables
#[derive(Debug)]
pub struct PivotTable<'a> {
    table: &'a Table,
    spec: PivotSpec,
    row_fields: Vec<&'a Column>,
    column_fields: Vec<&'a Column>,
    value_fields: Vec<&'a Column>,
}

impl<'a> PivotTable<'a> {
    /// Create a new pivot table, validating the requested fields against the table
    pub fn new(table: &'a Table, spec: PivotSpec) -> Result<Self> {
        if spec.rows.is_empty() && spec.columns.is_empty() {
            return Err(Error::InvalidInput(
                "a pivot needs at least one row or column key".into(),
            ));
        }

        let row_fields = spec
            .rows
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>>>()?;
        let column_fields = spec
            .columns
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>>>()?;

        let value_fields = match &spec.values {
            Some(name) => {
                let column = table.column(name)?;
                if column.column_type() == ColumnType::Text && spec.aggfunc != AggFunction::Count {
                    return Err(Error::ColumnType {
                        name: name.clone(),
                        expected: ColumnType::Numeric.to_string(),
                        found: ColumnType::Text.to_string(),
                    });
                }
                vec![column]
            }
            None => {
                let fields: Vec<&Column> = table
                    .numeric_columns()
                    .into_iter()
                    .filter(|c| !spec.rows.iter().chain(&spec.columns).any(|k| k == c.name()))
                    .collect();
                if fields.is_empty() {
                    return Err(Error::InvalidInput(
                        "no numeric value columns left to aggregate".into(),
                    ));
                }
                fields
            }
        };

        Ok(PivotTable {
            table,
            spec,
            row_fields,
            column_fields,
            value_fields,
        })
    }

    pub fn spec(&self) -> &PivotSpec {
        &self.spec
    }

    /// Execute the pivot
    pub fn execute(&self) -> Result<PivotResult> {
        let mut cells: BTreeMap<(GroupKey, GroupKey), Vec<usize>> = BTreeMap::new();
        let mut by_row: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
        let mut by_column: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
        let mut all_rows = Vec::new();

        let mut dropped = 0;
        for row in 0..self.table.row_count() {
            let (Some(row_key), Some(column_key)) = (
                group_key(&self.row_fields, row),
                group_key(&self.column_fields, row),
            ) else {
                dropped += 1;
                continue;
            };
            by_row.entry(row_key.clone()).or_default().push(row);
            by_column.entry(column_key.clone()).or_default().push(row);
            cells.entry((row_key, column_key)).or_default().push(row);
            all_rows.push(row);
        }
        if dropped > 0 {
            debug!("pivot dropped {} rows with a missing key", dropped);
        }

        let row_margin = self.spec.margins && !self.row_fields.is_empty();
        let column_margin = self.spec.margins && !self.column_fields.is_empty();
        let single_value = self.value_fields.len() == 1;
        let keyed_columns = !self.column_fields.is_empty();

        let mut column_labels = Vec::new();
        for value in &self.value_fields {
            for column_key in by_column.keys() {
                let label = column_label(value.name(), Some(column_key), single_value, keyed_columns);
                column_labels.push((label, false));
            }
            if column_margin {
                let label = column_label(value.name(), None, single_value, keyed_columns);
                column_labels.push((label, true));
            }
        }
        let column_labels = disambiguate(&self.spec.rows, column_labels);

        let mut row_keys: Vec<Vec<String>> = by_row
            .keys()
            .map(|key| key.iter().map(|p| p.label.clone()).collect())
            .collect();
        let mut values = Vec::with_capacity(row_keys.len() + 1);

        for (row_key, row_members) in &by_row {
            let mut out = Vec::with_capacity(column_labels.len());
            for value in &self.value_fields {
                for column_key in by_column.keys() {
                    let members = cells.get(&(row_key.clone(), column_key.clone()));
                    out.push(members.and_then(|m| self.aggregate(value.data(), m)));
                }
                if column_margin {
                    out.push(self.aggregate(value.data(), row_members));
                }
            }
            values.push(out);
        }

        if row_margin {
            let mut label = vec![String::new(); self.row_fields.len()];
            label[0] = MARGIN_LABEL.to_string();
            row_keys.push(label);

            let mut out = Vec::with_capacity(column_labels.len());
            for value in &self.value_fields {
                for column_members in by_column.values() {
                    out.push(self.aggregate(value.data(), column_members));
                }
                if column_margin {
                    out.push(self.aggregate(value.data(), &all_rows));
                }
            }
            values.push(out);
        }

        Ok(PivotResult {
            row_fields: self.spec.rows.clone(),
            row_keys,
            column_labels,
            values,
        })
    }

    fn aggregate(&self, data: &ColumnData, members: &[usize]) -> Option<f64> {
        if members.is_empty() {
            return None;
        }
        if self.spec.aggfunc == AggFunction::Count {
            let count = members.iter().filter(|&&r| !data.is_missing(r)).count();
            return Some(count as f64);
        }
        let present: Vec<f64> = match data.as_numeric() {
            Some(column) => members.iter().filter_map(|&r| column[r]).collect(),
            None => Vec::new(),
        };
        if present.is_empty() {
            return None;
        }
        self.spec.aggfunc.apply(&present)
    }
}

fn group_key(fields: &[&Column], row: usize) -> Option<GroupKey> {
    fields
        .iter()
        .map(|column| {
            let label = column.data().display_value(row)?;
            let number = column.data().as_numeric().and_then(|v| v[row]);
            Some(KeyPart { label, number })
        })
        .collect()
}

fn column_label(value: &str, key: Option<&GroupKey>, single_value: bool, keyed: bool) -> String {
    if !keyed {
        return value.to_string();
    }
    let key = match key {
        Some(parts) => parts
            .iter()
            .map(|p| p.label.as_str())
            .collect::<Vec<_>>()
            .join("_"),
        None => MARGIN_LABEL.to_string(),
    };
    if single_value {
        key
    } else {
        format!("{}_{}", value, key)
    }
}

/// Makes `(label, is_margin)` labels unique by appending `_2`, `_3`, ...
///
/// Row field names are claimed first, then margin labels, then key labels
/// in column order.
fn disambiguate(row_fields: &[String], labels: Vec<(String, bool)>) -> Vec<String> {
    fn claim(taken: &mut HashSet<String>, label: &str) -> String {
        let mut candidate = label.to_string();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{}_{}", label, n);
            n += 1;
        }
        if candidate != label {
            debug!("pivot column '{}' renamed to '{}'", label, candidate);
        }
        taken.insert(candidate.clone());
        candidate
    }

    let mut taken: HashSet<String> = row_fields.iter().cloned().collect();
    let mut out: Vec<Option<String>> = vec![None; labels.len()];
    for (slot, (label, _)) in out.iter_mut().zip(&labels).filter(|(_, (_, m))| *m) {
        *slot = Some(claim(&mut taken, label));
    }
    for (slot, (label, _)) in out.iter_mut().zip(&labels).filter(|(_, (_, m))| !*m) {
        *slot = Some(claim(&mut taken, label));
    }
    out.into_iter().flatten().collect()
}

/// Output of [`PivotTable::execute`]
///
/// Column labels are flattened: the column-key values joined with `_`,
/// prefixed with the value column name when several value columns are
/// aggregated. Labels are unique and never repeat a row field name. When
/// flattening collides (keys `("a_b", "c")` and `("a", "b_c")`, or a key
/// equal to a row field), the later label gets a `_2`, `_3`, ... suffix.
/// The margin column keeps `All`, so a key spelled `All` becomes `All_2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotResult {
    row_fields: Vec<String>,
    row_keys: Vec<Vec<String>>,
    column_labels: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl PivotResult {
    pub fn row_fields(&self) -> &[String] {
        &self.row_fields
    }

    pub fn row_keys(&self) -> &[Vec<String>] {
        &self.row_keys
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Aggregated values, one vector per row key
    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    /// Looks up a cell by row key and column label.
    pub fn get(&self, row_key: &[&str], column_label: &str) -> Option<f64> {
        let row = self
            .row_keys
            .iter()
            .position(|k| k.iter().map(String::as_str).eq(row_key.iter().copied()))?;
        let column = self.column_labels.iter().position(|c| c == column_label)?;
        self.values[row][column]
    }

    /// Flattens the pivot into a table: one text column per row field
    /// followed by one numeric column per label.
    pub fn to_table(&self) -> Result<Table> {
        let mut columns = Vec::with_capacity(self.row_fields.len() + self.column_labels.len());
        for (i, field) in self.row_fields.iter().enumerate() {
            let data = self
                .row_keys
                .iter()
                .map(|k| Some(k[i].clone()).filter(|s| !s.is_empty()))
                .collect();
            columns.push(Column::text(field.clone(), data));
        }
        for (j, label) in self.column_labels.iter().enumerate() {
            let data = self.values.iter().map(|row| row[j]).collect();
            columns.push(Column::numeric(label.clone(), data));
        }
        Table::new(columns)
    }
}

/// Extension for Table: pivot table functionality
impl Table {
    /// Create a pivot table
    pub fn pivot_table(&self, spec: PivotSpec) -> Result<PivotResult> {
        PivotTable::new(self, spec)?.execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> Table {
        Table::new(vec![
            Column::text(
                "Region",
                vec![
                    Some("East".into()),
                    Some("West".into()),
                    Some("East".into()),
                    None,
                    Some("West".into()),
                ],
            ),
            Column::numeric(
                "Year",
                vec![Some(2024.0), Some(2024.0), Some(2023.0), Some(2023.0), Some(2023.0)],
            ),
            Column::numeric(
                "Sales",
                vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_agg_function_parse() {
        assert_eq!("avg".parse::<AggFunction>().unwrap(), AggFunction::Mean);
        assert_eq!("STD".parse::<AggFunction>().unwrap(), AggFunction::Std);
        assert!("mode".parse::<AggFunction>().is_err());
    }

    #[test]
    fn test_agg_function_apply() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(AggFunction::Sum.apply(&values), Some(10.0));
        assert_eq!(AggFunction::Median.apply(&values), Some(2.5));
        assert_eq!(AggFunction::Min.apply(&values), Some(1.0));
        assert_eq!(AggFunction::Max.apply(&values), Some(4.0));
        assert_eq!(AggFunction::Mean.apply(&[]), None);
        assert_eq!(AggFunction::Std.apply(&[5.0]), None);
    }

    #[test]
    fn test_requires_a_key() {
        let table = sales();
        let err = PivotTable::new(&table, PivotSpec::new().values("Sales")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_text_values_only_count() {
        let table = sales();
        let spec = PivotSpec::new().rows(["Year"]).values("Region");
        assert!(matches!(
            PivotTable::new(&table, spec.clone()).unwrap_err(),
            Error::ColumnType { .. }
        ));
        let result = table.pivot_table(spec.aggfunc(AggFunction::Count)).unwrap();
        assert_eq!(result.get(&["2023"], "Region"), Some(2.0));
    }

    #[test]
    fn test_numeric_keys_sort_by_value() {
        let table = sales();
        let result = table
            .pivot_table(PivotSpec::new().rows(["Year"]).values("Sales"))
            .unwrap();
        assert_eq!(result.row_keys(), &[vec!["2023".to_string()], vec!["2024".to_string()]]);
        assert_eq!(result.get(&["2023"], "Sales"), Some(70.0));
    }

    #[test]
    fn test_missing_keys_are_dropped_with_margins() {
        let table = sales();
        let result = table
            .pivot_table(
                PivotSpec::new()
                    .rows(["Region"])
                    .columns(["Year"])
                    .values("Sales")
                    .margins(true),
            )
            .unwrap();
        assert_eq!(result.column_labels(), &["2023", "2024", "All"]);
        assert_eq!(result.get(&["East"], "2023"), Some(30.0));
        assert_eq!(result.get(&["West"], "2023"), None);
        assert_eq!(result.get(&["East"], "All"), Some(40.0));
        assert_eq!(result.get(&["East"], "2024"), Some(10.0));
        assert_eq!(result.get(&["All"], "All"), Some(60.0));
        assert_eq!(result.get(&["All"], "2023"), Some(30.0));
    }
}
