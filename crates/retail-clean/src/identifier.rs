//! Identifier validation.
//!
//! Two predicates cover the uses in the rule sets: a strict round-trip check
//! for the user and order identifier columns, and the looser textual pattern
//! the product dataset is filtered on (which admits uppercase hex).

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// True iff the string is the canonical textual form of a UUID: parsing it
/// and re-serializing in lowercase hyphenated form reproduces the input
/// exactly. Uppercase hex, missing hyphens, braces, and URN prefixes all
/// fail the round trip.
pub fn is_canonical_uuid(value: &str) -> bool {
    match Uuid::parse_str(value) {
        Ok(parsed) => parsed.to_string() == value,
        Err(_) => false,
    }
}

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        )
        .expect("valid uuid pattern")
    })
}

/// True iff the string matches the hyphenated UUID shape, case-insensitively.
pub fn matches_uuid_pattern(value: &str) -> bool {
    uuid_pattern().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_form() {
        assert!(is_canonical_uuid("93caf182-e4e9-4c58-a8ce-f23d31d664a2"));
    }

    #[test]
    fn rejects_non_canonical_variants() {
        // Valid UUIDs, wrong serialization.
        assert!(!is_canonical_uuid("93CAF182-E4E9-4C58-A8CE-F23D31D664A2"));
        assert!(!is_canonical_uuid("93caf182e4e94c58a8cef23d31d664a2"));
        assert!(!is_canonical_uuid("{93caf182-e4e9-4c58-a8ce-f23d31d664a2}"));
    }

    #[test]
    fn rejects_noise() {
        assert!(!is_canonical_uuid("not-a-uuid"));
        assert!(!is_canonical_uuid(""));
        assert!(!is_canonical_uuid("NULL"));
    }

    #[test]
    fn pattern_check_admits_uppercase_hex() {
        assert!(matches_uuid_pattern("93CAF182-E4E9-4C58-A8CE-F23D31D664A2"));
        assert!(matches_uuid_pattern("93caf182-e4e9-4c58-a8ce-f23d31d664a2"));
        assert!(!matches_uuid_pattern("93caf182e4e94c58a8cef23d31d664a2"));
        assert!(!matches_uuid_pattern("not-a-uuid"));
    }
}
