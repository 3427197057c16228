//! User rule set.
//!
//! Users come from the legacy relational table with sentinel nulls, mixed
//! date shapes, an unreliable country_code for the United Kingdom, phone
//! numbers in whatever format the customer typed, and a user_uuid column
//! that must be canonical.

use anyhow::Result;
use regex::Regex;

use retail_model::Entity;

use crate::engine::{CleanRule, EntityCleaner, RuleCategory, RuleMetadata};
use crate::frame::EntityFrame;
use crate::frame_utils::{opt_string_column, require_column, set_opt_string_column};
use crate::rules::{CoerceDates, KeepCanonicalIds, NormalizeNulls, SetValueWhere};

/// Dialing-convention patterns per supported country code. Matching follows
/// match-from-start semantics; a number that fails its country's pattern is
/// blanked to missing, and countries outside this table are left untouched.
const PHONE_PATTERNS: [(&str, &str); 3] = [
    (
        "GB",
        r"^(?:(?:\+44\s?\(0\)\s?\d{2,4}|\(?\d{2,5}\)?)\s?\d{3,4}\s?\d{3,4}$|\d{10,11}|\+44\s?\d{2,5}\s?\d{3,4}\s?\d{3,4})$",
    ),
    ("DE", r"(\(?([\d \-\)–+/(]+){6,}\)?([ .\-–/]?)([\d]+))"),
    ("US", r"\(?\d{3}\)?-? *\d{3}-? *-?\d{4}"),
];

struct PhoneFormatRule {
    meta: RuleMetadata,
    patterns: Vec<(&'static str, Regex)>,
}

impl PhoneFormatRule {
    fn new() -> Self {
        let patterns = PHONE_PATTERNS
            .iter()
            .map(|(code, pattern)| {
                let anchored = format!("^(?:{pattern})");
                (
                    *code,
                    Regex::new(&anchored).expect("valid phone pattern"),
                )
            })
            .collect();
        Self {
            meta: RuleMetadata::new(
                "users.phone-format",
                RuleCategory::Coercion,
                "blank phone numbers that fail their country's dialing pattern",
            ),
            patterns,
        }
    }
}

impl CleanRule for PhoneFormatRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn apply(&self, frame: &mut EntityFrame) -> Result<()> {
        require_column(frame, "country_code")?;
        require_column(frame, "phone_number")?;
        let codes = opt_string_column(&frame.data, "country_code")?;
        let mut phones = opt_string_column(&frame.data, "phone_number")?;
        for (idx, code) in codes.iter().enumerate() {
            let Some(code) = code.as_deref() else {
                continue;
            };
            let Some((_, pattern)) = self
                .patterns
                .iter()
                .find(|(pattern_code, _)| *pattern_code == code)
            else {
                continue;
            };
            let valid = phones[idx]
                .as_deref()
                .is_some_and(|phone| pattern.is_match(phone));
            if !valid {
                phones[idx] = None;
            }
        }
        set_opt_string_column(&mut frame.data, "phone_number", phones)?;
        Ok(())
    }
}

/// Users: normalize nulls, coerce the two date columns, repair the UK
/// country code, enforce phone formats, and keep only canonical user ids.
pub fn build_users_cleaner() -> EntityCleaner {
    let mut cleaner = EntityCleaner::new(Entity::Users);
    cleaner
        .add_rule(Box::new(NormalizeNulls::new("users.normalize-nulls", &["NULL"])))
        .add_rule(Box::new(CoerceDates::new(
            "users.coerce-dates",
            &["date_of_birth", "join_date"],
        )))
        .add_rule(Box::new(SetValueWhere::new(
            "users.uk-country-code",
            "country_code",
            "GB",
            "country",
            "United Kingdom",
        )))
        .add_rule(Box::new(PhoneFormatRule::new()))
        .add_rule(Box::new(KeepCanonicalIds::new(
            "users.valid-uuid",
            &["user_uuid"],
        )));
    cleaner
}
