//! Product weight normalization.
//!
//! Raw weights are free text: "77g", "1.5kg", "500ml", multi-pack encodings
//! like "3 x 100g", and occasional noise. Everything is expressed in
//! kilograms. The unit policy is deliberately simple: only a detected `g` or
//! `ml` suffix triggers a division by 1000; `kg`, `l`, and unrecognized
//! units pass the number through unchanged (a liter counts as a kilogram).

use std::sync::OnceLock;

use regex::Regex;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number pattern"))
}

fn unit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)([gkmlKGML]+)").expect("valid unit pattern"))
}

fn first_number(text: &str) -> Option<f64> {
    number_pattern()
        .find(text)
        .and_then(|found| found.as_str().parse::<f64>().ok())
}

/// The non-digit part of the first digits-then-letters run in the raw
/// string, e.g. "100g" yields "g" and "1.5kg" yields "kg".
fn detect_unit(raw: &str) -> Option<String> {
    unit_pattern()
        .captures(raw)
        .and_then(|captures| captures.get(2))
        .map(|unit| unit.as_str().to_string())
}

/// Parse a raw weight string into kilograms; None when no number is found.
///
/// A multiplication separator `x` splits the string into a pack count and a
/// unit weight whose product is the total; if either side carries no number
/// the whole value is missing.
pub fn parse_weight_kg(raw: &str) -> Option<f64> {
    let value = if raw.contains('x') {
        let (count_part, weight_part) = raw.split_once('x')?;
        let count = first_number(count_part)?;
        let unit_weight = first_number(weight_part)?;
        count * unit_weight
    } else {
        first_number(raw)?
    };
    match detect_unit(raw).as_deref() {
        Some("g") | Some("ml") => Some(value / 1000.0),
        _ => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grams_convert_to_kilograms() {
        assert_eq!(parse_weight_kg("200g"), Some(0.2));
        assert_eq!(parse_weight_kg("77g ."), Some(0.077));
    }

    #[test]
    fn milliliters_convert_like_grams() {
        assert_eq!(parse_weight_kg("500ml"), Some(0.5));
    }

    #[test]
    fn kilograms_and_liters_pass_through() {
        assert_eq!(parse_weight_kg("1.5kg"), Some(1.5));
        assert_eq!(parse_weight_kg("2l"), Some(2.0));
    }

    #[test]
    fn multipacks_multiply_count_and_unit_weight() {
        assert_eq!(parse_weight_kg("3 x 100g"), Some(0.3));
        assert_eq!(parse_weight_kg("16 x 10g"), Some(0.16));
        assert_eq!(parse_weight_kg("2 x 1.5kg"), Some(3.0));
    }

    #[test]
    fn broken_multipacks_are_missing() {
        assert_eq!(parse_weight_kg("x 100g"), None);
        assert_eq!(parse_weight_kg("3 x"), None);
    }

    #[test]
    fn noise_is_missing() {
        assert_eq!(parse_weight_kg("assorted"), None);
        assert_eq!(parse_weight_kg(""), None);
        assert_eq!(parse_weight_kg("NULL"), None);
    }

    #[test]
    fn uppercase_units_do_not_convert() {
        // The conversion policy matches the lowercase suffixes only.
        assert_eq!(parse_weight_kg("200G"), Some(200.0));
    }
}
