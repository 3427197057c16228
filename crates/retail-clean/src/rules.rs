//! Reusable cleaning rules.
//!
//! These cover the operations shared by several entities: null
//! normalization, date and integer coercion, value rewrites, enumerated and
//! identifier row filters, and column reshaping. Entity-specific rules (the
//! phone, weight, price, staff-count, and availability logic) live next to
//! their rule set in `cleaners/`.

use anyhow::Result;
use polars::prelude::AnyValue;
use tracing::debug;

use retail_ingest::any_to_i64;

use crate::datetime::coerce_date_string;
use crate::engine::{CleanRule, RuleCategory, RuleMetadata};
use crate::frame::EntityFrame;
use crate::frame_utils::{
    filter_rows, has_column, opt_string_column, require_column, set_i64_column,
    set_opt_string_column, set_string_column, string_column,
};
use crate::identifier::{is_canonical_uuid, matches_uuid_pattern};
use crate::nulls::{normalize_nulls, promote_index, replace_sentinels};

/// The full sentinel/duplicate/null-row/index normalization sequence.
pub struct NormalizeNulls {
    meta: RuleMetadata,
    sentinels: Vec<&'static str>,
}

impl NormalizeNulls {
    pub fn new(id: &str, sentinels: &[&'static str]) -> Self {
        Self {
            meta: RuleMetadata::new(
                id,
                RuleCategory::Nulls,
                "collapse sentinels, drop duplicates and null rows, promote index",
            ),
            sentinels: sentinels.to_vec(),
        }
    }
}

impl CleanRule for NormalizeNulls {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        normalize_nulls(frame, &self.sentinels)
    }
}

/// Sentinel replacement only, for rule sets that keep their own row policy.
pub struct ReplaceSentinels {
    meta: RuleMetadata,
    sentinels: Vec<&'static str>,
}

impl ReplaceSentinels {
    pub fn new(id: &str, sentinels: &[&'static str]) -> Self {
        Self {
            meta: RuleMetadata::new(
                id,
                RuleCategory::Nulls,
                "collapse sentinel markers to nulls",
            ),
            sentinels: sentinels.to_vec(),
        }
    }
}

impl CleanRule for ReplaceSentinels {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        replace_sentinels(&mut frame.data, &self.sentinels)
    }
}

/// Coerce columns to canonical `YYYY-MM-DD` text; unparseable cells become
/// missing.
pub struct CoerceDates {
    meta: RuleMetadata,
    columns: Vec<&'static str>,
}

impl CoerceDates {
    pub fn new(id: &str, columns: &[&'static str]) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Coercion, "coerce to calendar dates"),
            columns: columns.to_vec(),
        }
    }
}

impl CleanRule for CoerceDates {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        for column in &self.columns {
            require_column(frame, column)?;
            let values = opt_string_column(&frame.data, column)?
                .into_iter()
                .map(|value| value.and_then(|cell| coerce_date_string(&cell)))
                .collect();
            set_opt_string_column(&mut frame.data, column, values)?;
        }
        Ok(())
    }
}

/// Coerce columns to integers; unparseable cells become missing and are NOT
/// dropped here.
pub struct CoerceIntegers {
    meta: RuleMetadata,
    columns: Vec<&'static str>,
}

impl CoerceIntegers {
    pub fn new(id: &str, columns: &[&'static str]) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Coercion, "coerce to integers"),
            columns: columns.to_vec(),
        }
    }
}

impl CleanRule for CoerceIntegers {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        for column in &self.columns {
            require_column(frame, column)?;
            let series = frame.data.column(column)?;
            let mut values = Vec::with_capacity(frame.data.height());
            for idx in 0..frame.data.height() {
                let value = series.get(idx).unwrap_or(AnyValue::Null);
                values.push(any_to_i64(value));
            }
            set_i64_column(&mut frame.data, column, values)?;
        }
        Ok(())
    }
}

/// Set `target` to a fixed value on rows where `when_column` equals a
/// literal. Creates the target column (all null) when it does not exist.
pub struct SetValueWhere {
    meta: RuleMetadata,
    target: &'static str,
    value: &'static str,
    when_column: &'static str,
    equals: &'static str,
}

impl SetValueWhere {
    pub fn new(
        id: &str,
        target: &'static str,
        value: &'static str,
        when_column: &'static str,
        equals: &'static str,
    ) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Reshape, "conditional value assignment"),
            target,
            value,
            when_column,
            equals,
        }
    }
}

impl CleanRule for SetValueWhere {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, self.when_column)?;
        let matches = opt_string_column(&frame.data, self.when_column)?;
        let mut values = if has_column(&frame.data, self.target) {
            opt_string_column(&frame.data, self.target)?
        } else {
            vec![None; frame.data.height()]
        };
        for (idx, when_value) in matches.iter().enumerate() {
            if when_value.as_deref() == Some(self.equals) {
                values[idx] = Some(self.value.to_string());
            }
        }
        set_opt_string_column(&mut frame.data, self.target, values)?;
        Ok(())
    }
}

/// Rewrite literal cell values in one column, e.g. continent typos.
pub struct RewriteValues {
    meta: RuleMetadata,
    column: &'static str,
    pairs: Vec<(&'static str, &'static str)>,
}

impl RewriteValues {
    pub fn new(id: &str, column: &'static str, pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Reshape, "rewrite literal values"),
            column,
            pairs: pairs.to_vec(),
        }
    }
}

impl CleanRule for RewriteValues {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, self.column)?;
        let values = opt_string_column(&frame.data, self.column)?
            .into_iter()
            .map(|value| {
                value.map(|cell| {
                    for (from, to) in &self.pairs {
                        if cell == *from {
                            return (*to).to_string();
                        }
                    }
                    cell
                })
            })
            .collect();
        set_opt_string_column(&mut frame.data, self.column, values)?;
        Ok(())
    }
}

/// Keep only rows whose column value is one of the allowed literals; null
/// and out-of-set rows are silently excluded.
pub struct KeepRowsWithValues {
    meta: RuleMetadata,
    column: &'static str,
    allowed: Vec<&'static str>,
}

impl KeepRowsWithValues {
    pub fn new(id: &str, column: &'static str, allowed: &[&'static str]) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Validation, "enumerated value row filter"),
            column,
            allowed: allowed.to_vec(),
        }
    }
}

impl CleanRule for KeepRowsWithValues {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, self.column)?;
        let values = opt_string_column(&frame.data, self.column)?;
        let keep: Vec<bool> = values
            .iter()
            .map(|value| {
                value
                    .as_deref()
                    .is_some_and(|cell| self.allowed.contains(&cell))
            })
            .collect();
        let dropped = keep.iter().filter(|kept| !**kept).count();
        if dropped > 0 {
            debug!(
                column = self.column,
                dropped, "excluded rows outside the allowed value set"
            );
        }
        filter_rows(&mut frame.data, &keep)?;
        Ok(())
    }
}

/// Keep only rows whose identifier columns all hold canonical-form UUIDs.
pub struct KeepCanonicalIds {
    meta: RuleMetadata,
    columns: Vec<&'static str>,
}

impl KeepCanonicalIds {
    pub fn new(id: &str, columns: &[&'static str]) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Validation, "canonical identifier filter"),
            columns: columns.to_vec(),
        }
    }
}

impl CleanRule for KeepCanonicalIds {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        let mut keep = vec![true; frame.data.height()];
        for column in &self.columns {
            require_column(frame, column)?;
            let values = opt_string_column(&frame.data, column)?;
            for (idx, value) in values.iter().enumerate() {
                if !value.as_deref().is_some_and(is_canonical_uuid) {
                    keep[idx] = false;
                }
            }
        }
        let dropped = keep.iter().filter(|kept| !**kept).count();
        if dropped > 0 {
            debug!(dropped, "excluded rows with invalid identifiers");
        }
        filter_rows(&mut frame.data, &keep)?;
        Ok(())
    }
}

/// Keep only rows whose column matches the textual UUID shape (either case).
pub struct KeepPatternIds {
    meta: RuleMetadata,
    column: &'static str,
}

impl KeepPatternIds {
    pub fn new(id: &str, column: &'static str) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Validation, "identifier pattern filter"),
            column,
        }
    }
}

impl CleanRule for KeepPatternIds {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, self.column)?;
        let values = opt_string_column(&frame.data, self.column)?;
        let keep: Vec<bool> = values
            .iter()
            .map(|value| value.as_deref().is_some_and(matches_uuid_pattern))
            .collect();
        filter_rows(&mut frame.data, &keep)?;
        Ok(())
    }
}

/// Drop columns. Required drops are structural: a missing column aborts.
pub struct DropColumns {
    meta: RuleMetadata,
    columns: Vec<&'static str>,
    required: bool,
}

impl DropColumns {
    pub fn new(id: &str, columns: &[&'static str], required: bool) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Reshape, "drop columns"),
            columns: columns.to_vec(),
            required,
        }
    }
}

impl CleanRule for DropColumns {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        for column in &self.columns {
            if has_column(&frame.data, column) {
                frame.data.drop_in_place(column)?;
            } else if self.required {
                require_column(frame, column)?;
            }
        }
        Ok(())
    }
}

/// Rename columns to their destination names; missing sources are skipped.
pub struct RenameColumns {
    meta: RuleMetadata,
    pairs: Vec<(&'static str, &'static str)>,
}

impl RenameColumns {
    pub fn new(id: &str, pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Reshape, "rename columns"),
            pairs: pairs.to_vec(),
        }
    }
}

impl CleanRule for RenameColumns {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        for (from, to) in &self.pairs {
            if has_column(&frame.data, from) {
                frame.data.rename(from, (*to).into())?;
            }
        }
        Ok(())
    }
}

/// Coerce a column to text and strip every non-word character.
pub struct StripNonWord {
    meta: RuleMetadata,
    column: &'static str,
}

impl StripNonWord {
    pub fn new(id: &str, column: &'static str) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Coercion, "strip non-word characters"),
            column,
        }
    }
}

impl CleanRule for StripNonWord {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, self.column)?;
        let values = string_column(&frame.data, self.column)?
            .into_iter()
            .map(|cell| {
                cell.chars()
                    .filter(|ch| ch.is_alphanumeric() || *ch == '_')
                    .collect::<String>()
            })
            .collect();
        set_string_column(&mut frame.data, self.column, values)?;
        Ok(())
    }
}

/// Promote the `index` column to primary key without touching rows.
pub struct PromoteIndex {
    meta: RuleMetadata,
}

impl PromoteIndex {
    pub fn new(id: &str) -> Self {
        Self {
            meta: RuleMetadata::new(id, RuleCategory::Reshape, "promote index to primary key"),
        }
    }
}

impl CleanRule for PromoteIndex {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        promote_index(frame);
        Ok(())
    }
}
