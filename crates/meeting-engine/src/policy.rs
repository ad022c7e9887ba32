//! Working-hours policy: when meetings may be placed.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// The `(start_hour, end_hour)` window, allowed weekdays, and the buffer
/// required between consecutive meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHoursPolicy {
    /// First hour (local, 0-23) a meeting may start.
    pub start_hour: u32,
    /// Hour (local, 1-24) by which a meeting must have ended.
    pub end_hour: u32,
    pub weekdays: Vec<Weekday>,
    pub buffer_minutes: u32,
}

impl Default for WorkingHoursPolicy {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            buffer_minutes: 15,
        }
    }
}

impl WorkingHoursPolicy {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
            ..Self::default()
        }
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn with_buffer(mut self, buffer_minutes: u32) -> Self {
        self.buffer_minutes = buffer_minutes;
        self
    }

    pub fn buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_minutes))
    }

    /// # Errors
    /// Returns `SchedulerError::InvalidInput` unless
    /// `start_hour < end_hour <= 24` and at least one weekday is allowed.
    pub fn validate(&self) -> Result<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(SchedulerError::InvalidInput(format!(
                "working hours {}-{} must satisfy start < end <= 24",
                self.start_hour, self.end_hour
            )));
        }
        if self.weekdays.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "working hours allow no weekdays".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the slot `[start, end)` lies inside working hours in `tz`.
    ///
    /// Compares full local timestamps against the day's opening and closing
    /// times, so a 16:50-17:50 slot is rejected under a 17:00 close. The slot
    /// must start on an allowed weekday and end on that same working day.
    pub fn admits(&self, start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> bool {
        let local_start = start.with_timezone(&tz).naive_local();
        let local_end = end.with_timezone(&tz).naive_local();

        if !self.weekdays.contains(&local_start.weekday()) {
            return false;
        }

        let midnight = local_start.date().and_time(NaiveTime::MIN);
        let open = midnight + Duration::hours(i64::from(self.start_hour));
        let close = midnight + Duration::hours(i64::from(self.end_hour));

        local_start >= open && local_end <= close
    }
}
