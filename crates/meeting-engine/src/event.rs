//! Calendar events and the busy intervals derived from them.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{Result, SchedulerError};
use crate::interval::{TimeInterval, Timestamp};
use crate::source::RawEvent;

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub minutes_before: u32,
    pub method: ReminderMethod,
}

/// The atomic unit of scheduling.
///
/// `start < end` always holds; both are UTC instants. `timezone` is the zone
/// the event is displayed and constructed in and plays no part in comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Assigned by the event source; `None` for events not yet written.
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub attendees: Vec<String>,
    /// Opaque RRULE text. Never expanded here.
    pub recurrence: Option<String>,
    pub reminders: Vec<Reminder>,
    pub calendar_id: String,
    pub timezone: Tz,
}

impl CalendarEvent {
    /// # Errors
    /// Returns `SchedulerError::InvalidInput` unless `start < end`.
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        calendar_id: impl Into<String>,
        timezone: Tz,
    ) -> Result<Self> {
        TimeInterval::new(start, end)?;
        Ok(Self {
            id: None,
            title: title.into(),
            description: String::new(),
            start,
            end,
            location: String::new(),
            attendees: Vec::new(),
            recurrence: None,
            reminders: Vec::new(),
            calendar_id: calendar_id.into(),
            timezone,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reminder(mut self, minutes_before: u32, method: ReminderMethod) -> Self {
        self.reminders.push(Reminder {
            minutes_before,
            method,
        });
        self
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// A copy of this event moved to `[start, end)`.
    ///
    /// Content, attendees, calendar and timezone carry over. The id, recurrence
    /// and reminders do not: the result is a new, unwritten event.
    pub fn rescheduled(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Ok(Self::new(
            self.title.clone(),
            start,
            end,
            self.calendar_id.clone(),
            self.timezone,
        )?
        .with_description(self.description.clone())
        .with_location(self.location.clone())
        .with_attendees(self.attendees.iter().cloned()))
    }

    /// Reject events whose bounds are inverted or empty.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(SchedulerError::InvalidInput(format!(
                "event '{}' starts at {} but ends at {}",
                self.title,
                self.start.to_rfc3339(),
                self.end.to_rfc3339()
            )));
        }
        Ok(())
    }
}

/// A normalized busy range, with the event it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyInterval {
    pub interval: TimeInterval,
    pub calendar_id: String,
    pub event: CalendarEvent,
    pub all_day: bool,
}

impl BusyInterval {
    /// Normalize an event-source record.
    ///
    /// Returns `Ok(None)` for records that cannot block time: cancelled events
    /// and events whose end is not after their start.
    ///
    /// # Errors
    /// Returns `SchedulerError::InvalidTimestamp` when `start` or `end` cannot
    /// be parsed.
    pub fn from_raw(
        raw: &RawEvent,
        calendar_id: &str,
        timezone: Tz,
        dst: DstPolicy,
    ) -> Result<Option<Self>> {
        if raw.is_cancelled() {
            return Ok(None);
        }

        let start_ts = Timestamp::parse(&raw.start)?;
        let end_ts = Timestamp::parse(&raw.end)?;
        let start = start_ts.normalize(timezone, dst)?;
        let end = end_ts.normalize(timezone, dst)?;
        if start >= end {
            tracing::debug!(event_id = %raw.id, calendar_id, "skipping event with empty duration");
            return Ok(None);
        }

        let event = CalendarEvent {
            id: (!raw.id.is_empty()).then(|| raw.id.clone()),
            title: raw.title.clone(),
            description: raw.description.clone(),
            start,
            end,
            location: raw.location.clone(),
            attendees: raw.attendees.clone(),
            recurrence: None,
            reminders: Vec::new(),
            calendar_id: calendar_id.to_string(),
            timezone,
        };

        Ok(Some(Self {
            interval: TimeInterval { start, end },
            calendar_id: calendar_id.to_string(),
            event,
            all_day: start_ts.is_all_day(),
        }))
    }
}
