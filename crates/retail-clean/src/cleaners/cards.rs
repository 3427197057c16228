//! Card payment rule set.
//!
//! Cards arrive from the PDF extraction with sentinel nulls and card numbers
//! polluted by stray punctuation from the document conversion.

use retail_model::Entity;

use crate::engine::EntityCleaner;
use crate::rules::{CoerceDates, NormalizeNulls, StripNonWord};

/// Cards: normalize nulls, coerce the payment date, and reduce card numbers
/// to word characters only.
pub fn build_cards_cleaner() -> EntityCleaner {
    let mut cleaner = EntityCleaner::new(Entity::Cards);
    cleaner
        .add_rule(Box::new(NormalizeNulls::new("cards.normalize-nulls", &["NULL"])))
        .add_rule(Box::new(CoerceDates::new(
            "cards.coerce-dates",
            &["date_payment_confirmed"],
        )))
        .add_rule(Box::new(StripNonWord::new(
            "cards.card-number-characters",
            "card_number",
        )));
    cleaner
}
