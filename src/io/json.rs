use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::column::ColumnData;
use crate::error::Result;
use crate::table::Table;

/// JSON output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonOrient {
    /// Record format [{col1:val1, col2:val2}, ...]
    #[default]
    Records,
    /// Column format {col1: [val1, val2, ...], col2: [...]}
    Columns,
}

/// Write a table to a JSON file
pub fn write_json<P: AsRef<Path>>(table: &Table, path: P, orient: JsonOrient) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &to_json_value(table, orient))?;
    Ok(())
}

/// Converts a table to a JSON value; missing cells become `null`.
pub fn to_json_value(table: &Table, orient: JsonOrient) -> Value {
    match orient {
        JsonOrient::Records => Value::Array(
            (0..table.row_count())
                .map(|row| {
                    let record: Map<String, Value> = table
                        .columns()
                        .iter()
                        .map(|c| (c.name().to_string(), cell_value(c.data(), row)))
                        .collect();
                    Value::Object(record)
                })
                .collect(),
        ),
        JsonOrient::Columns => Value::Object(
            table
                .columns()
                .iter()
                .map(|c| {
                    let values = (0..c.len()).map(|row| cell_value(c.data(), row)).collect();
                    (c.name().to_string(), Value::Array(values))
                })
                .collect(),
        ),
    }
}

fn cell_value(data: &ColumnData, row: usize) -> Value {
    match data {
        ColumnData::Numeric(values) => values[row]
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnData::Text(values) => values[row]
            .as_ref()
            .map(|s| Value::String(s.clone()))
            .unwrap_or(Value::Null),
        ColumnData::Empty(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    #[test]
    fn test_records_and_columns() {
        let table = Table::new(vec![
            Column::text("Region", vec![Some("North".into()), None]),
            Column::numeric("Sales", vec![Some(1.5), Some(2.0)]),
        ])
        .unwrap();

        let records = to_json_value(&table, JsonOrient::Records);
        assert_eq!(records[0]["Region"], "North");
        assert_eq!(records[1]["Region"], Value::Null);
        assert_eq!(records[1]["Sales"], 2.0);

        let columns = to_json_value(&table, JsonOrient::Columns);
        assert_eq!(columns["Sales"][0], 1.5);
    }
}
