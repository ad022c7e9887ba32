//! The event-source contract consumed by the scheduler.
//!
//! The scheduler never owns calendar data. It asks an [`EventSource`] for the
//! events of one calendar over a window and receives [`RawEvent`] records,
//! which are normalized at the boundary (see [`crate::event`]).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dst::DstPolicy;
use crate::interval::Timestamp;

/// Failure reported by an event source (network, auth, quota, bad data).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An event exactly as an event source returns it.
///
/// `start` and `end` are ISO-8601 strings: RFC 3339, naive date-times, or
/// date-only values for all-day events. Recurring events are expected to be
/// flattened into single occurrences already.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub attendees: Vec<String>,
    pub status: String,
    pub organizer_email: Option<String>,
}

impl RawEvent {
    pub fn new(id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            status: "confirmed".to_string(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case("cancelled")
    }
}

/// Read access to calendar events.
///
/// Implementations return events overlapping `[start, end]`, ordered by start
/// time, single occurrences only, at most `max_results` of them. Timeouts and
/// retries belong to the implementation.
pub trait EventSource {
    fn fetch_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: usize,
    ) -> Result<Vec<RawEvent>, SourceError>;
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn fetch_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: usize,
    ) -> Result<Vec<RawEvent>, SourceError> {
        (**self).fetch_events(calendar_id, start, end, max_results)
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn fetch_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: usize,
    ) -> Result<Vec<RawEvent>, SourceError> {
        (**self).fetch_events(calendar_id, start, end, max_results)
    }
}

/// An in-process event source keyed by calendar id.
///
/// Windowing needs real instants, so raw timestamps are resolved with the same
/// zone and DST policy the scheduler uses. Unknown calendars are empty.
#[derive(Debug, Clone)]
pub struct MemorySource {
    calendars: HashMap<String, Vec<RawEvent>>,
    failures: HashMap<String, String>,
    timezone: Tz,
    dst: DstPolicy,
}

impl MemorySource {
    pub fn new(timezone: Tz) -> Self {
        Self {
            calendars: HashMap::new(),
            failures: HashMap::new(),
            timezone,
            dst: DstPolicy::default(),
        }
    }

    pub fn with_dst_policy(mut self, dst: DstPolicy) -> Self {
        self.dst = dst;
        self
    }

    /// Build from a JSON object mapping calendar id to an array of events.
    ///
    /// ```json
    /// {"primary": [{"id": "a", "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T10:00:00Z"}]}
    /// ```
    pub fn from_json(json: &str, timezone: Tz) -> Result<Self, serde_json::Error> {
        let calendars: HashMap<String, Vec<RawEvent>> = serde_json::from_str(json)?;
        Ok(Self {
            calendars,
            ..Self::new(timezone)
        })
    }

    pub fn insert(&mut self, calendar_id: impl Into<String>, event: RawEvent) {
        self.calendars
            .entry(calendar_id.into())
            .or_default()
            .push(event);
    }

    /// Make every subsequent fetch for `calendar_id` fail with `message`.
    pub fn fail_calendar(&mut self, calendar_id: impl Into<String>, message: impl Into<String>) {
        self.failures.insert(calendar_id.into(), message.into());
    }

    pub fn calendar_ids(&self) -> impl Iterator<Item = &str> {
        self.calendars.keys().map(String::as_str)
    }

    fn bounds(&self, event: &RawEvent) -> Result<(DateTime<Utc>, DateTime<Utc>), SourceError> {
        let resolve = |raw: &str| {
            Timestamp::parse(raw)
                .and_then(|ts| ts.normalize(self.timezone, self.dst))
                .map_err(|e| SourceError::new(format!("event '{}': {}", event.id, e)))
        };
        Ok((resolve(&event.start)?, resolve(&event.end)?))
    }
}

impl EventSource for MemorySource {
    fn fetch_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: usize,
    ) -> Result<Vec<RawEvent>, SourceError> {
        if let Some(message) = self.failures.get(calendar_id) {
            return Err(SourceError::new(message.clone()));
        }
        let Some(events) = self.calendars.get(calendar_id) else {
            return Ok(Vec::new());
        };

        let mut in_window = Vec::new();
        for event in events {
            let (ev_start, ev_end) = self.bounds(event)?;
            if ev_start < end && ev_end > start {
                in_window.push((ev_start, event.clone()));
            }
        }
        in_window.sort_by_key(|(ev_start, _)| *ev_start);

        Ok(in_window
            .into_iter()
            .take(max_results)
            .map(|(_, event)| event)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn fetch_returns_window_sorted_and_truncated() {
        let mut source = MemorySource::new(chrono_tz::UTC);
        source.insert("primary", RawEvent::new("late", "2026-03-02T15:00:00Z", "2026-03-02T16:00:00Z"));
        source.insert("primary", RawEvent::new("early", "2026-03-02T09:00:00Z", "2026-03-02T10:00:00Z"));
        source.insert("primary", RawEvent::new("mid", "2026-03-02T12:00:00Z", "2026-03-02T13:00:00Z"));
        source.insert("primary", RawEvent::new("outside", "2026-03-03T09:00:00Z", "2026-03-03T10:00:00Z"));

        let events = source
            .fetch_events("primary", utc("2026-03-02T00:00:00Z"), utc("2026-03-03T00:00:00Z"), 2)
            .unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "mid"]);
    }

    #[test]
    fn unknown_calendar_is_empty_and_failures_surface() {
        let mut source = MemorySource::new(chrono_tz::UTC);
        let window = (utc("2026-03-02T00:00:00Z"), utc("2026-03-03T00:00:00Z"));
        assert!(source.fetch_events("nope", window.0, window.1, 10).unwrap().is_empty());

        source.fail_calendar("work", "quota exceeded");
        let err = source.fetch_events("work", window.0, window.1, 10).unwrap_err();
        assert_eq!(err.message, "quota exceeded");
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let json = r#"{"primary":[{"id":"a","start":"2026-03-02","end":"2026-03-03"}]}"#;
        let source = MemorySource::from_json(json, chrono_tz::UTC).unwrap();
        let events = source
            .fetch_events("primary", utc("2026-03-02T00:00:00Z"), utc("2026-03-02T12:00:00Z"), 10)
            .unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].attendees.is_empty());
        assert_eq!(events[0].status, "");
    }
}
