//! Lenient calendar-date coercion.
//!
//! The source datasets mix ISO dates with several free-text shapes
//! ("1968 October 16", "July 1961 14", "16/10/1968"). Coercion tries a fixed
//! format list and reports failure as a missing value; callers decide whether
//! missing dates survive (they are dropped wherever a null-row filter runs
//! afterwards, and retained otherwise).

use chrono::NaiveDate;

/// Formats attempted in order. The ISO form comes first because it is the
/// dominant shape in every source.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y %B %d",
    "%B %Y %d",
    "%d %B %Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
];

/// Parse a date in any of the supported shapes; None when nothing matches.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Datetime strings keep only their date portion.
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    for format in DATE_FORMATS {
        if format.contains("%B") {
            // Month-name formats need the full trimmed string.
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Some(date);
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }
    None
}

/// Coerce to the canonical `YYYY-MM-DD` text form; None for unparseable input.
pub fn coerce_date_string(raw: &str) -> Option<String> {
    parse_flexible_date(raw).map(|date| date.format("%Y-%m-%d").to_string())
}
