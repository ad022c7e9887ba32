//! Turn free slots into substitute events for a conflicting proposal.

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{Result, SchedulerError};
use crate::event::CalendarEvent;
use crate::freebusy::FreeSlot;
use crate::interval::{localize, TimeInterval};
use crate::policy::WorkingHoursPolicy;

/// The window searched for alternatives to `proposed`.
///
/// Starts at the policy's opening hour on the proposed event's local calendar
/// day (which may be earlier than the proposal itself) and runs for
/// `horizon_days`.
pub fn search_window(
    proposed: &CalendarEvent,
    policy: &WorkingHoursPolicy,
    tz: Tz,
    dst: DstPolicy,
    horizon_days: u32,
) -> Result<TimeInterval> {
    let day = proposed.start.with_timezone(&tz).date_naive();
    let opening = day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(policy.start_hour));
    let start = localize(opening, tz, dst)?;
    let end = Duration::try_days(i64::from(horizon_days))
        .and_then(|horizon| start.checked_add_signed(horizon))
        .ok_or_else(|| {
            SchedulerError::InvalidInput(format!(
                "alternatives horizon of {} days is out of range",
                horizon_days
            ))
        })?;
    TimeInterval::new(start, end)
}

/// Clone `proposed` into each of the first `limit` slots, preserving slot order.
pub fn alternatives_from_slots(
    proposed: &CalendarEvent,
    slots: &[FreeSlot],
    limit: usize,
) -> Result<Vec<CalendarEvent>> {
    slots
        .iter()
        .take(limit)
        .map(|slot| proposed.rescheduled(slot.start, slot.end))
        .collect()
}
