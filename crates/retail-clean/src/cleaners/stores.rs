//! Store rule set.
//!
//! Stores come from the REST API with two sentinel markers ("NULL" and
//! "N/A"), a redundant `lat` column, typo'd continents, corrupted staff
//! counts, and a handful of garbage rows carrying invented country codes.
//! Rows with a country code outside {GB, DE, US} are filtered out rather
//! than blanked, so the cleaned table satisfies its membership invariant.

use anyhow::Result;

use retail_model::Entity;

use crate::engine::{CleanRule, EntityCleaner, RuleCategory, RuleMetadata};
use crate::frame::EntityFrame;
use crate::frame_utils::{opt_string_column, require_column, set_i64_column};
use crate::rules::{
    CoerceDates, DropColumns, KeepRowsWithValues, PromoteIndex, ReplaceSentinels, RewriteValues,
};

struct StaffNumbersRule {
    meta: RuleMetadata,
}

impl StaffNumbersRule {
    fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                "stores.staff-numbers",
                RuleCategory::Coercion,
                "strip non-digit characters and parse staff counts as integers",
            ),
        }
    }
}

impl CleanRule for StaffNumbersRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, "staff_numbers")?;
        let values = opt_string_column(&frame.data, "staff_numbers")?
            .into_iter()
            .map(|value| {
                value.and_then(|cell| {
                    let digits: String =
                        cell.chars().filter(char::is_ascii_digit).collect();
                    digits.parse::<i64>().ok()
                })
            })
            .collect();
        set_i64_column(&mut frame.data, "staff_numbers", values)?;
        Ok(())
    }
}

struct DropNullRowsRule {
    meta: RuleMetadata,
}

impl DropNullRowsRule {
    fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                "stores.drop-null-rows",
                RuleCategory::Nulls,
                "drop rows with any remaining null",
            ),
        }
    }
}

impl CleanRule for DropNullRowsRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        crate::nulls::drop_null_rows(&mut frame.data)
    }
}

/// Stores: sentinel cleanup, drop `lat`, fix continent typos, filter to the
/// supported country codes, parse staff counts, coerce the opening date,
/// drop incomplete rows, and promote the index.
pub fn build_stores_cleaner() -> EntityCleaner {
    let mut cleaner = EntityCleaner::new(Entity::Stores);
    cleaner
        .add_rule(Box::new(ReplaceSentinels::new(
            "stores.sentinels",
            &["NULL", "N/A"],
        )))
        .add_rule(Box::new(DropColumns::new("stores.drop-lat", &["lat"], true)))
        .add_rule(Box::new(RewriteValues::new(
            "stores.continent-typos",
            "continent",
            &[("eeEurope", "Europe"), ("eeAmerica", "America")],
        )))
        .add_rule(Box::new(KeepRowsWithValues::new(
            "stores.valid-country-code",
            "country_code",
            &["GB", "US", "DE"],
        )))
        .add_rule(Box::new(StaffNumbersRule::new()))
        .add_rule(Box::new(CoerceDates::new(
            "stores.coerce-dates",
            &["opening_date"],
        )))
        .add_rule(Box::new(DropNullRowsRule::new()))
        .add_rule(Box::new(PromoteIndex::new("stores.promote-index")));
    cleaner
}
