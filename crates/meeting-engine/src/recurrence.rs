//! RRULE composition for recurring events.
//!
//! Rules are built and validated here, then stored on the event as opaque
//! text. Expansion into occurrences is the event source's job.

use chrono::{DateTime, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::event::CalendarEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    fn as_rrule(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

/// How a series ends. `Until` wins over any count, matching how the rule is
/// composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceEnd {
    Never,
    Until(DateTime<Utc>),
    Count(u32),
}

/// Compose an `RRULE:` line, e.g. `RRULE:FREQ=WEEKLY;COUNT=4`.
///
/// # Errors
/// Returns `SchedulerError::InvalidRule` for `RecurrenceEnd::Count(0)`.
pub fn build_rrule(freq: Frequency, end: RecurrenceEnd) -> Result<String> {
    let mut parts = vec![format!("FREQ={}", freq.as_rrule())];
    match end {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Until(until) => {
            parts.push(format!("UNTIL={}", until.format("%Y%m%dT%H%M%SZ")));
        }
        RecurrenceEnd::Count(0) => {
            return Err(SchedulerError::InvalidRule(
                "COUNT must be at least 1".to_string(),
            ));
        }
        RecurrenceEnd::Count(count) => parts.push(format!("COUNT={}", count)),
    }
    Ok(format!("RRULE:{}", parts.join(";")))
}

/// Check that `rule` parses as an RFC 5545 rule anchored at `dtstart`.
///
/// The `RRULE:` prefix is optional.
pub fn validate_rrule(rule: &str, dtstart: DateTime<Utc>) -> Result<()> {
    let body = rule.trim();
    let body = body.strip_prefix("RRULE:").unwrap_or(body);
    if body.is_empty() {
        return Err(SchedulerError::InvalidRule("empty RRULE string".to_string()));
    }

    // The rrule crate wants a UTC UNTIL paired with a UTC DTSTART.
    let text = format!(
        "DTSTART;TZID=UTC:{}\nRRULE:{}",
        dtstart.format("%Y%m%dT%H%M%S"),
        body
    );
    text.parse::<RRuleSet>()
        .map(|_| ())
        .map_err(|e| SchedulerError::InvalidRule(format!("{}", e)))
}

impl CalendarEvent {
    /// Attach a validated recurrence rule anchored at this event's start.
    pub fn with_recurrence(mut self, freq: Frequency, end: RecurrenceEnd) -> Result<Self> {
        let rule = build_rrule(freq, end)?;
        validate_rrule(&rule, self.start)?;
        self.recurrence = Some(rule);
        Ok(self)
    }
}
