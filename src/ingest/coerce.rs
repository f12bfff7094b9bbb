//! Numeric coercion of ingested columns.

use serde::{Deserialize, Serialize};

use crate::cell::RawCell;
use crate::column::ColumnData;

/// What happens to a column when some of its cells are not numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Numeric only if every present cell converts, text otherwise.
    #[default]
    AllOrNothing,
    /// Numeric if any present cell converts; failing cells become missing.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Coerced {
    Missing,
    Number(f64),
    Failed,
}

fn coerce_cell(cell: &RawCell) -> Coerced {
    if cell.is_empty() {
        return Coerced::Missing;
    }
    match cell {
        RawCell::Number(n) if n.is_finite() => Coerced::Number(*n),
        RawCell::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_nan() => Coerced::Missing,
            Ok(v) if v.is_finite() => Coerced::Number(v),
            _ => Coerced::Failed,
        },
        _ => Coerced::Failed,
    }
}

/// Types one column of data cells.
pub(crate) fn coerce_column(cells: &[&RawCell], policy: CoercionPolicy) -> ColumnData {
    let coerced: Vec<Coerced> = cells.iter().map(|c| coerce_cell(c)).collect();
    let numbers = coerced
        .iter()
        .filter(|c| matches!(c, Coerced::Number(_)))
        .count();
    let failed = coerced.iter().filter(|c| **c == Coerced::Failed).count();

    if numbers == 0 && failed == 0 {
        return ColumnData::Empty(cells.len());
    }

    let numeric = match policy {
        CoercionPolicy::AllOrNothing => failed == 0,
        CoercionPolicy::BestEffort => numbers > 0,
    };

    if numeric {
        ColumnData::Numeric(
            coerced
                .into_iter()
                .map(|c| match c {
                    Coerced::Number(v) => Some(v),
                    _ => None,
                })
                .collect(),
        )
    } else {
        ColumnData::Text(cells.iter().map(|c| c.to_text()).collect())
    }
}
