//! Timezone-to-local-date resolution
//!
//! Daily content is bucketed by the requester's local calendar date, so a
//! reader in Tokyo flips to the next day's horoscope hours before one in
//! New York. Every function here is total: unknown or malformed timezone
//! names degrade to UTC rather than failing the request.

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

/// Fallback timezone name used whenever resolution fails
pub const UTC: &str = "UTC";

/// Whether `name` resolves in the IANA timezone database
pub fn is_valid_timezone(name: &str) -> bool {
    TimeZone::get(name).is_ok()
}

/// `name` when it is a known IANA timezone, otherwise `"UTC"`
///
/// Requester-supplied timezone strings always pass through this guard
/// before they influence cache keys or date resolution.
pub fn safe_timezone(name: &str) -> &str {
    if is_valid_timezone(name) { name } else { UTC }
}

/// Today's calendar date as observed in `name`
pub fn local_date(name: &str) -> Date {
    local_date_at(name, Timestamp::now())
}

/// The calendar date of the instant `at` as observed in `name`
pub fn local_date_at(name: &str, at: Timestamp) -> Date {
    let tz = TimeZone::get(name).unwrap_or(TimeZone::UTC);
    tz.to_datetime(at).date()
}

/// Today's calendar date in UTC
pub fn utc_date() -> Date {
    TimeZone::UTC.to_datetime(Timestamp::now()).date()
}
