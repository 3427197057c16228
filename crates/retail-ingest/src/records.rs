//! Building typed DataFrames from loosely-typed source records.
//!
//! The store API returns JSON documents and object storage returns CSV text;
//! both arrive as untyped cells. Columns are typed by inspection: a column
//! whose populated cells are all integers becomes Int64, all numerics becomes
//! Float64, all booleans Boolean, anything else String. Missing cells stay
//! null so the cleaners can tell absence from an empty string sentinel.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame};
use serde_json::Value;

use crate::polars_utils::format_numeric;

/// One untyped cell read from a source document.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl RawCell {
    /// Interpret a JSON value as a cell. Arrays and objects are flattened to
    /// their JSON text, which keeps stray nested payloads visible downstream.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => RawCell::Null,
            Value::Bool(b) => RawCell::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawCell::Int(i)
                } else {
                    RawCell::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => RawCell::Text(s.clone()),
            other => RawCell::Text(other.to_string()),
        }
    }

    /// Interpret a CSV field as a cell. Empty fields are null; numeric text
    /// keeps its numeric reading.
    pub fn from_csv(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return RawCell::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return RawCell::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return RawCell::Float(f);
        }
        RawCell::Text(field.to_string())
    }

    fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Null => None,
            RawCell::Int(i) => Some(i.to_string()),
            RawCell::Float(f) => Some(format_numeric(*f)),
            RawCell::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            RawCell::Text(s) => Some(s.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Empty,
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    fn merge(self, cell: &RawCell) -> Self {
        let cell_kind = match cell {
            RawCell::Null => return self,
            RawCell::Int(_) => ColumnKind::Int,
            RawCell::Float(_) => ColumnKind::Float,
            RawCell::Bool(_) => ColumnKind::Bool,
            RawCell::Text(_) => ColumnKind::Text,
        };
        match (self, cell_kind) {
            (ColumnKind::Empty, kind) => kind,
            (a, b) if a == b => a,
            (ColumnKind::Int, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Int) => {
                ColumnKind::Float
            }
            _ => ColumnKind::Text,
        }
    }
}

/// Build a DataFrame from per-row cells under the given headers.
///
/// Rows shorter than the header list are padded with nulls; longer rows are
/// a structural defect in the source and abort the build.
pub fn frame_from_cells(headers: &[String], rows: &[Vec<RawCell>]) -> Result<DataFrame> {
    for (idx, row) in rows.iter().enumerate() {
        if row.len() > headers.len() {
            anyhow::bail!(
                "row {idx} has {} fields but only {} headers",
                row.len(),
                headers.len()
            );
        }
    }
    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let mut kind = ColumnKind::Empty;
        for row in rows {
            kind = kind.merge(row.get(col_idx).unwrap_or(&RawCell::Null));
        }
        let column = match kind {
            ColumnKind::Int => {
                let values: Vec<Option<i64>> = rows
                    .iter()
                    .map(|row| match row.get(col_idx) {
                        Some(RawCell::Int(i)) => Some(*i),
                        _ => None,
                    })
                    .collect();
                Column::new(header.as_str().into(), values)
            }
            ColumnKind::Float => {
                let values: Vec<Option<f64>> = rows
                    .iter()
                    .map(|row| match row.get(col_idx) {
                        Some(RawCell::Int(i)) => Some(*i as f64),
                        Some(RawCell::Float(f)) => Some(*f),
                        _ => None,
                    })
                    .collect();
                Column::new(header.as_str().into(), values)
            }
            ColumnKind::Bool => {
                let values: Vec<Option<bool>> = rows
                    .iter()
                    .map(|row| match row.get(col_idx) {
                        Some(RawCell::Bool(b)) => Some(*b),
                        _ => None,
                    })
                    .collect();
                Column::new(header.as_str().into(), values)
            }
            ColumnKind::Empty | ColumnKind::Text => {
                let values: Vec<Option<String>> = rows
                    .iter()
                    .map(|row| row.get(col_idx).and_then(RawCell::as_text))
                    .collect();
                Column::new(header.as_str().into(), values)
            }
        };
        columns.push(column);
    }
    DataFrame::new(columns).context("build dataframe from source cells")
}

/// Build a DataFrame from JSON objects, one row per object.
///
/// Column order is first-seen order across the records; records missing a
/// key contribute a null cell for it.
pub fn records_to_frame(records: &[serde_json::Map<String, Value>]) -> Result<DataFrame> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.iter().any(|existing| existing == key) {
                headers.push(key.clone());
            }
        }
    }
    let rows: Vec<Vec<RawCell>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|header| {
                    record
                        .get(header)
                        .map(RawCell::from_json)
                        .unwrap_or(RawCell::Null)
                })
                .collect()
        })
        .collect();
    frame_from_cells(&headers, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_map(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn json_records_union_columns_in_first_seen_order() {
        let records = vec![
            to_map(json!({"index": 0, "address": "High St"})),
            to_map(json!({"index": 1, "address": "Main St", "lat": null})),
        ];
        let df = records_to_frame(&records).unwrap();
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
            vec!["index", "address", "lat"]
        );
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn integer_columns_stay_integer() {
        let records = vec![
            to_map(json!({"staff_numbers": 12})),
            to_map(json!({"staff_numbers": 30})),
        ];
        let df = records_to_frame(&records).unwrap();
        let column = df.column("staff_numbers").unwrap();
        assert_eq!(column.get(0).unwrap().try_extract::<i64>().unwrap(), 12);
    }

    #[test]
    fn mixed_columns_fall_back_to_text() {
        let records = vec![
            to_map(json!({"staff_numbers": 12})),
            to_map(json!({"staff_numbers": "3n9"})),
        ];
        let df = records_to_frame(&records).unwrap();
        let value = df.column("staff_numbers").unwrap().get(1).unwrap();
        assert_eq!(crate::polars_utils::any_to_string(value), "3n9");
    }

    #[test]
    fn csv_cells_type_numbers_and_null_empties() {
        assert_eq!(RawCell::from_csv("42"), RawCell::Int(42));
        assert_eq!(RawCell::from_csv("1.5"), RawCell::Float(1.5));
        assert_eq!(RawCell::from_csv(""), RawCell::Null);
        assert_eq!(
            RawCell::from_csv("still_available"),
            RawCell::Text("still_available".to_string())
        );
    }

    #[test]
    fn overlong_rows_are_structural_errors() {
        let headers = vec!["a".to_string()];
        let rows = vec![vec![RawCell::Int(1), RawCell::Int(2)]];
        assert!(frame_from_cells(&headers, &rows).is_err());
    }
}
