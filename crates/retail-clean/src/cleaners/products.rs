//! Product rule set.
//!
//! Products arrive as a CSV object with free-text weights, `£`-prefixed
//! prices, an availability flag spelled "Still_avaliable" in the source
//! (the literal is matched as-is), and a stray unnamed index column.

use anyhow::Result;

use retail_model::Entity;

use crate::engine::{CleanRule, EntityCleaner, RuleCategory, RuleMetadata};
use crate::frame::EntityFrame;
use crate::frame_utils::{
    opt_string_column, require_column, set_bool_column, set_f64_column,
};
use crate::rules::{CoerceDates, KeepPatternIds, PromoteIndex, RenameColumns};
use crate::weights::parse_weight_kg;

struct WeightRule {
    meta: RuleMetadata,
}

impl WeightRule {
    fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                "products.weight-kg",
                RuleCategory::Coercion,
                "convert free-text weights to kilograms",
            ),
        }
    }
}

impl CleanRule for WeightRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, "weight")?;
        let values = opt_string_column(&frame.data, "weight")?
            .into_iter()
            .map(|value| value.and_then(|cell| parse_weight_kg(&cell)))
            .collect();
        set_f64_column(&mut frame.data, "weight", values)?;
        Ok(())
    }
}

struct PriceRule {
    meta: RuleMetadata,
}

impl PriceRule {
    fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                "products.price-gbp",
                RuleCategory::Coercion,
                "strip the currency symbol and parse prices to two decimals",
            ),
        }
    }
}

impl CleanRule for PriceRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, "product_price")?;
        let values = opt_string_column(&frame.data, "product_price")?
            .into_iter()
            .map(|value| {
                value.and_then(|cell| {
                    // The first character is the currency symbol.
                    let remainder: String = cell.chars().skip(1).collect();
                    let parsed = remainder.trim().parse::<f64>().ok()?;
                    Some((parsed * 100.0).round() / 100.0)
                })
            })
            .collect();
        set_f64_column(&mut frame.data, "product_price", values)?;
        Ok(())
    }
}

struct AvailabilityRule {
    meta: RuleMetadata,
}

impl AvailabilityRule {
    fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                "products.availability",
                RuleCategory::Coercion,
                "map the removal flag to a boolean availability column",
            ),
        }
    }
}

impl CleanRule for AvailabilityRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, "removed")?;
        let values = opt_string_column(&frame.data, "removed")?
            .into_iter()
            .map(|value| value.as_deref() == Some("Still_avaliable"))
            .collect();
        set_bool_column(&mut frame.data, "removed", values)?;
        Ok(())
    }
}

/// Products: convert weights first, then parse prices, coerce the added
/// date, map availability, keep UUID-shaped ids, and rename everything to
/// its destination column.
pub fn build_products_cleaner() -> EntityCleaner {
    let mut cleaner = EntityCleaner::new(Entity::Products);
    cleaner
        .add_rule(Box::new(WeightRule::new()))
        .add_rule(Box::new(PriceRule::new()))
        .add_rule(Box::new(CoerceDates::new(
            "products.coerce-dates",
            &["date_added"],
        )))
        .add_rule(Box::new(AvailabilityRule::new()))
        .add_rule(Box::new(KeepPatternIds::new("products.uuid-shape", "uuid")))
        .add_rule(Box::new(RenameColumns::new(
            "products.destination-names",
            &[
                ("unnamed_0", "index"),
                ("weight", "weight_kg"),
                ("EAN", "ean"),
                ("product_price", "product_price_gbp"),
                ("removed", "still_available"),
            ],
        )))
        .add_rule(Box::new(PromoteIndex::new("products.promote-index")));
    cleaner
}
