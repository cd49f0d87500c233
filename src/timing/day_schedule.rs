use serde::{Deserialize, Serialize};

/// One weekday's opening state.
///
/// Times are kept as the raw `HH:MM` strings found in the store. A day can be
/// marked open without one of its bounds, the missing side is then rendered
/// blank.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[serde(default)]
    is_open: bool,
    #[serde(default)]
    open_time: Option<String>,
    #[serde(default)]
    close_time: Option<String>,
}

impl DaySchedule {
    pub fn new_open(open_time: &str, close_time: &str) -> Self {
        Self {
            is_open: true,
            open_time: Some(open_time.to_string()),
            close_time: Some(close_time.to_string()),
        }
    }

    pub fn new_closed() -> Self {
        Self {
            is_open: false,
            open_time: None,
            close_time: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open_time(&self) -> Option<&str> {
        self.open_time.as_deref()
    }

    pub fn close_time(&self) -> Option<&str> {
        self.close_time.as_deref()
    }
}
