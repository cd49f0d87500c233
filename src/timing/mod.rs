pub mod clock;
pub mod day_schedule;
pub mod format;
pub mod weekly_hours;
