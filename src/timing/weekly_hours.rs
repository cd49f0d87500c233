use std::collections::BTreeMap;

use chrono::Weekday;
use tracing::warn;

use super::{clock::Clock, day_schedule::DaySchedule, format::format_time};

/// Canonical display order of the hours table.
pub const DAYS_OF_WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Weekday name → schedule, keyed by the English day name as stored.
pub type WeeklyHours = BTreeMap<String, DaySchedule>;

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// What to show for a single day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DayHours {
    Closed,
    /// Already formatted bounds. Blank when the bound is absent or malformed.
    Open { open: String, close: String },
}

impl DayHours {
    /// Text for a row of the hours table.
    pub fn display(&self) -> String {
        match self {
            DayHours::Closed => "Closed".to_string(),
            DayHours::Open { open, close } => format!("{} - {}", open, close),
        }
    }

    /// Text for the compact summary next to the phone number.
    pub fn display_today(&self) -> String {
        match self {
            DayHours::Closed => "Closed Today".to_string(),
            open => open.display(),
        }
    }
}

/// A row of the hours table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayRow {
    pub day: &'static str,
    pub hours: DayHours,
}

/// Decide what to show for `day`. A day missing from the map is closed.
pub fn resolve_day(hours: &WeeklyHours, day: Weekday) -> DayHours {
    let Some(schedule) = hours.get(weekday_name(day)) else {
        return DayHours::Closed;
    };
    if !schedule.is_open() {
        return DayHours::Closed;
    }
    DayHours::Open {
        open: display_bound(schedule.open_time()),
        close: display_bound(schedule.close_time()),
    }
}

pub fn today_hours(hours: &WeeklyHours, clock: &dyn Clock) -> DayHours {
    resolve_day(hours, clock.today())
}

/// All seven days, Sunday first.
pub fn weekly_table(hours: &WeeklyHours) -> Vec<DayRow> {
    DAYS_OF_WEEK
        .iter()
        .map(|day| DayRow {
            day: weekday_name(*day),
            hours: resolve_day(hours, *day),
        })
        .collect()
}

fn display_bound(time: Option<&str>) -> String {
    let Some(time) = time else {
        return String::new();
    };
    match format_time(time) {
        Ok(text) => text,
        Err(err) => {
            warn!("{}", err);
            String::new()
        }
    }
}
