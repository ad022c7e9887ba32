//! Scheduler configuration.
//!
//! One explicit value handed to [`crate::Scheduler::new`]; nothing in the crate
//! reads global settings.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::policy::WorkingHoursPolicy;

/// What to do when the event source fails for one calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Propagate the error to the caller.
    #[default]
    FailClosed,
    /// Log a warning and treat the calendar as having no events. Results may
    /// then overstate availability and understate conflicts.
    FailOpen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Zone for localizing naive timestamps and evaluating working hours.
    pub timezone: Tz,
    pub working_hours: WorkingHoursPolicy,
    /// Calendar queried when the caller names none.
    pub default_calendar: String,
    /// Upper bound on slots returned by one free-slot search.
    pub max_slots: usize,
    /// Upper bound on events requested per calendar fetch.
    pub max_results: usize,
    /// Padding on each side of a proposed event when fetching for conflicts.
    pub conflict_padding_minutes: u32,
    pub alternatives_horizon_days: u32,
    pub default_suggestions: usize,
    pub on_fetch_error: FetchFailurePolicy,
    pub dst_policy: DstPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Kolkata,
            working_hours: WorkingHoursPolicy::default(),
            default_calendar: "primary".to_string(),
            max_slots: 10,
            max_results: 100,
            conflict_padding_minutes: 60,
            alternatives_horizon_days: 7,
            default_suggestions: 3,
            on_fetch_error: FetchFailurePolicy::default(),
            dst_policy: DstPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_working_hours(mut self, working_hours: WorkingHoursPolicy) -> Self {
        self.working_hours = working_hours;
        self
    }

    pub fn with_fetch_failure_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.on_fetch_error = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_config_over_defaults() {
        let json = r#"{"timezone":"Europe/Berlin","working_hours":{"start_hour":8},"on_fetch_error":"fail_open"}"#;
        let config: SchedulerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.working_hours.start_hour, 8);
        assert_eq!(config.working_hours.end_hour, 17);
        assert_eq!(config.on_fetch_error, FetchFailurePolicy::FailOpen);
        assert_eq!(config.max_slots, 10);
    }
}
