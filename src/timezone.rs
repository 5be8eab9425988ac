//! Converting the API's UTC timestamps into the console's local timezone.

use time::{
    OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description,
};
use time_tz::{Offset, TimeZone};

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Parse an RFC 3339 timestamp and shift it into `canonical_timezone`.
///
/// The offset is taken at the timestamp itself, so daylight saving is
/// accounted for. Unknown timezones leave the timestamp in its own offset.
fn to_local(timestamp: &str, canonical_timezone: &str) -> Option<OffsetDateTime> {
    let date_time = OffsetDateTime::parse(timestamp, &Rfc3339).ok()?;

    match time_tz::timezones::get_by_name(canonical_timezone) {
        Some(tz) => Some(date_time.to_offset(tz.get_offset_utc(&date_time).to_utc())),
        None => Some(date_time),
    }
}

/// Format an RFC 3339 timestamp as e.g. "01 May 2024 17:00:00" in local time.
///
/// Anything that is not a valid timestamp is returned as is.
pub fn format_local_date_time(timestamp: &str, canonical_timezone: &str) -> String {
    to_local(timestamp, canonical_timezone)
        .and_then(|date_time| {
            date_time
                .format(format_description!(
                    "[day] [month repr:short] [year] [hour]:[minute]:[second]"
                ))
                .ok()
        })
        .unwrap_or_else(|| timestamp.to_owned())
}

/// Format an RFC 3339 timestamp as e.g. "01 May 2024" in local time.
///
/// Anything that is not a valid timestamp is returned as is.
pub fn format_local_date(timestamp: &str, canonical_timezone: &str) -> String {
    to_local(timestamp, canonical_timezone)
        .and_then(|date_time| {
            date_time
                .format(format_description!("[day] [month repr:short] [year]"))
                .ok()
        })
        .unwrap_or_else(|| timestamp.to_owned())
}
