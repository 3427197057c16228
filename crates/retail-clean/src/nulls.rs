//! Sentinel null and duplicate normalization.
//!
//! Every rule set starts from the same defects: the literal string "NULL"
//! standing in for an absent value, repeated rows, and rows with holes.
//! The steps run in a fixed order (sentinels, duplicates, null rows, index
//! promotion); duplicate removal happens before null-row removal, so two
//! near-duplicate rows differing only in a null cell are NOT collapsed.
//! Running the whole sequence twice is a no-op.

use anyhow::Result;
use polars::prelude::{AnyValue, DataFrame, DataType};
use tracing::debug;

use retail_ingest::{any_is_null, any_to_string};

use crate::frame::EntityFrame;
use crate::frame_utils::{filter_rows, has_column, opt_string_column, set_opt_string_column};

/// Replace sentinel markers in string columns with true nulls.
pub fn replace_sentinels(df: &mut DataFrame, sentinels: &[&str]) -> Result<()> {
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::String)
        .map(|column| column.name().to_string())
        .collect();
    for name in names {
        let values = opt_string_column(df, &name)?
            .into_iter()
            .map(|value| value.filter(|cell| !sentinels.contains(&cell.as_str())))
            .collect();
        set_opt_string_column(df, &name, values)?;
    }
    Ok(())
}

/// Remove rows that are exact duplicates of an earlier row, keeping the
/// first occurrence. Null cells participate in the comparison as nulls, not
/// as empty strings.
pub fn drop_duplicates(df: &mut DataFrame) -> Result<()> {
    if df.height() == 0 {
        return Ok(());
    }
    let columns = df.get_columns().to_vec();
    let mut seen = std::collections::HashSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut key = String::new();
        for column in &columns {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            if any_is_null(&value) {
                key.push('\u{0}');
            } else {
                key.push_str(&any_to_string(value));
            }
            key.push('\u{1}');
        }
        keep.push(seen.insert(key));
    }
    let dropped = keep.iter().filter(|kept| !**kept).count();
    if dropped > 0 {
        debug!(dropped, "removed duplicate rows");
        filter_rows(df, &keep)?;
    }
    Ok(())
}

/// Remove every row containing a null in any column.
pub fn drop_null_rows(df: &mut DataFrame) -> Result<()> {
    if df.height() == 0 {
        return Ok(());
    }
    let columns = df.get_columns().to_vec();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let has_null = columns
            .iter()
            .any(|column| any_is_null(&column.get(idx).unwrap_or(AnyValue::Null)));
        keep.push(!has_null);
    }
    let dropped = keep.iter().filter(|kept| !**kept).count();
    if dropped > 0 {
        debug!(dropped, "removed rows containing nulls");
        filter_rows(df, &keep)?;
    }
    Ok(())
}

/// Promote a column literally named `index` to the frame's primary key.
pub fn promote_index(frame: &mut EntityFrame) {
    if has_column(&frame.data, "index") {
        frame.primary_key = Some("index".to_string());
    }
}

/// The full normalization sequence used by most rule sets.
pub fn normalize_nulls(frame: &mut EntityFrame, sentinels: &[&str]) -> Result<()> {
    replace_sentinels(&mut frame.data, sentinels)?;
    drop_duplicates(&mut frame.data)?;
    drop_null_rows(&mut frame.data)?;
    promote_index(frame);
    Ok(())
}
