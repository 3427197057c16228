//! Date-dimension rule set.
//!
//! Time-period membership is the validation gate; the calendar parts are
//! coerced to integers afterwards, so a part that fails coercion stays as a
//! missing value rather than dropping its row.

use retail_model::Entity;

use crate::engine::EntityCleaner;
use crate::rules::{CoerceIntegers, KeepRowsWithValues, NormalizeNulls};

/// The four valid day segments.
const TIME_PERIODS: [&str; 4] = ["Late_Hours", "Morning", "Midday", "Evening"];

/// Dates: normalize nulls, keep rows with a valid time period, and coerce
/// day/month/year to integers.
pub fn build_dates_cleaner() -> EntityCleaner {
    let mut cleaner = EntityCleaner::new(Entity::Dates);
    cleaner
        .add_rule(Box::new(NormalizeNulls::new("dates.normalize-nulls", &["NULL"])))
        .add_rule(Box::new(KeepRowsWithValues::new(
            "dates.time-period",
            "time_period",
            &TIME_PERIODS,
        )))
        .add_rule(Box::new(CoerceIntegers::new(
            "dates.calendar-parts",
            &["day", "month", "year"],
        )));
    cleaner
}
