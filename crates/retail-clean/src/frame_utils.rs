//! Row-wise column access helpers shared by the cleaning rules.
//!
//! Rules read a column into a plain vector, rework the values, and write the
//! result back as a fresh series; row filters go through a boolean mask.

use anyhow::Result;
use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series};

use retail_ingest::{any_is_null, any_to_string};
use retail_model::RetailError;

use crate::frame::EntityFrame;

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Fail with a structural error when a column the rules depend on is absent.
pub fn require_column(frame: &EntityFrame, name: &str) -> Result<()> {
    if has_column(&frame.data, name) {
        return Ok(());
    }
    Err(RetailError::MissingColumn {
        entity: frame.entity.key().to_string(),
        column: name.to_string(),
    }
    .into())
}

/// Read a column as trimmed strings; nulls become the empty string.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(series.get(idx).unwrap_or(AnyValue::Null));
        values.push(value.trim().to_string());
    }
    Ok(values)
}

/// Read a column as trimmed strings, keeping nulls distinct from empties.
pub fn opt_string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = series.get(idx).unwrap_or(AnyValue::Null);
        if any_is_null(&value) {
            values.push(None);
        } else {
            values.push(Some(any_to_string(value).trim().to_string()));
        }
    }
    Ok(values)
}

pub fn set_string_column(df: &mut DataFrame, name: &str, values: Vec<String>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn set_opt_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn set_f64_column(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn set_i64_column(df: &mut DataFrame, name: &str, values: Vec<Option<i64>>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn set_bool_column(df: &mut DataFrame, name: &str, values: Vec<bool>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

/// Keep only the rows whose mask entry is true.
pub fn filter_rows(df: &mut DataFrame, keep: &[bool]) -> Result<()> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    *df = df.filter(&mask)?;
    Ok(())
}
