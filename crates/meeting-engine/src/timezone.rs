//! Meeting-hour feasibility across participant timezones.
//!
//! Unlike the free-slot finder, this looks at no events at all. It asks which
//! hours of a reference day fall inside working hours for every participant at
//! once.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, SchedulerError};
use crate::interval::parse_timezone;

/// Maximum number of candidate hours returned.
pub const MAX_OPTIMAL_TIMES: usize = 5;

/// One participant's view of a candidate hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantTime {
    pub timezone: Tz,
    /// Local wall-clock time, `HH:MM`.
    pub local_time: String,
    pub suitable: bool,
}

/// A candidate meeting start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalTime {
    pub utc_hour: u32,
    pub start: DateTime<Utc>,
    pub timezone_info: Vec<ParticipantTime>,
    pub suitability_score: usize,
}

/// Rank the UTC hours of `reference`'s day by how many participants are inside
/// `working_hours` (`start_hour <= local hour < end_hour`).
///
/// Only hours suitable for every participant are kept, so every returned score
/// equals the participant count; the descending sort is stable and leaves them
/// in hour order. At most [`MAX_OPTIMAL_TIMES`] are returned.
///
/// # Errors
/// Returns `SchedulerError::InvalidInput` for an empty participant list or
/// working hours outside `start < end <= 24`, and
/// `SchedulerError::InvalidTimezone` for an unknown zone name.
pub fn find_optimal_times<S: AsRef<str>>(
    participant_timezones: &[S],
    working_hours: (u32, u32),
    reference: DateTime<Utc>,
) -> Result<Vec<OptimalTime>> {
    let (start_hour, end_hour) = working_hours;
    if start_hour >= end_hour || end_hour > 24 {
        return Err(SchedulerError::InvalidInput(format!(
            "working hours {}-{} must satisfy start < end <= 24",
            start_hour, end_hour
        )));
    }
    if participant_timezones.is_empty() {
        return Err(SchedulerError::InvalidInput(
            "at least one participant timezone is required".to_string(),
        ));
    }
    let zones = participant_timezones
        .iter()
        .map(|name| parse_timezone(name.as_ref()))
        .collect::<Result<Vec<Tz>>>()?;

    let midnight = Utc.from_utc_datetime(&reference.date_naive().and_time(NaiveTime::MIN));

    let mut optimal = Vec::new();
    for utc_hour in 0..24u32 {
        let start = midnight + Duration::hours(i64::from(utc_hour));

        let timezone_info: Vec<ParticipantTime> = zones
            .iter()
            .map(|tz| {
                let local = start.with_timezone(tz);
                ParticipantTime {
                    timezone: *tz,
                    local_time: local.format("%H:%M").to_string(),
                    suitable: (start_hour..end_hour).contains(&local.hour()),
                }
            })
            .collect();

        if timezone_info.iter().all(|info| info.suitable) {
            let suitability_score = timezone_info.iter().filter(|info| info.suitable).count();
            optimal.push(OptimalTime {
                utc_hour,
                start,
                timezone_info,
                suitability_score,
            });
        }
    }

    optimal.sort_by(|a, b| b.suitability_score.cmp(&a.suitability_score));
    optimal.truncate(MAX_OPTIMAL_TIMES);
    Ok(optimal)
}
