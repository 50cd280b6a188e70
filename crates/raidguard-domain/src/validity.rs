//! Observation validity window.

use time::{Date, Duration, Month, OffsetDateTime};

/// Observations stay valid for one calendar month after collection.
pub const OBSERVATION_VALIDITY_MONTHS: u32 = 1;

/// Expiry timestamp for an observation collected at `collected`.
pub fn observation_expiry(collected: OffsetDateTime) -> Option<OffsetDateTime> {
    add_months(collected, OBSERVATION_VALIDITY_MONTHS)
}

/// Add calendar months, keeping time of day and offset.
///
/// The day of month is carried over unchanged; when the target month is
/// shorter the excess days roll into the following month (Jan 31 + 1 month =
/// Mar 3, or Mar 2 in a leap year). Returns `None` outside the supported year
/// range.
pub fn add_months(at: OffsetDateTime, months: u32) -> Option<OffsetDateTime> {
    let date = at.date();
    let zero_based = i64::from(u8::from(date.month())) - 1 + i64::from(months);
    let year = i32::try_from(i64::from(date.year()) + zero_based / 12).ok()?;
    let month = Month::try_from(u8::try_from(zero_based % 12 + 1).ok()?).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let date = first.checked_add(Duration::days(i64::from(date.day()) - 1))?;
    Some(at.replace_date(date))
}
