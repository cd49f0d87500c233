use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;

/// Source of "today" for the hours summary.
///
/// Pages are rendered against the restaurant's local day, not the host's.
pub trait Clock: Send + Sync {
    fn today(&self) -> Weekday;
}

/// Wall clock, read on every render.
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Weekday {
        self.now().weekday()
    }
}

/// Always reports the same weekday.
#[cfg(test)]
pub struct FixedClock(pub Weekday);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> Weekday {
        self.0
    }
}
