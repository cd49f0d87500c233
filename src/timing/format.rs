use chrono::NaiveTime;

use crate::error::{SiteError, SiteResult};

/// 12 hour clock, no padding on the hour, uppercase suffix.
pub const DISPLAY_TIME_FORMAT: &str = "%-I:%M %p";

/**
Convert a 24 hour `HH:MM` string into display text, e.g. `"13:00"` becomes
`"1:00 PM"`.

The hour may be one or two digits, the minute must be exactly two. Anything
else, including out of range values, is an `InvalidTimeFormat` error.
*/
pub fn format_time(time: &str) -> SiteResult<String> {
    let invalid = || SiteError::InvalidTimeFormat(time.to_string());

    let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || hours.len() > 2 || !digits(minutes) || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let time_of_day = NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)?;

    Ok(time_of_day.format(DISPLAY_TIME_FORMAT).to_string())
}
