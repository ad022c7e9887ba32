//! Free-slot search over busy intervals.
//!
//! Busy intervals from every queried calendar are pooled, sorted by start, and
//! swept with a cursor. Each gap between the cursor and the next busy interval
//! yields at most one slot of the requested duration, placed at the start of
//! the gap. The cursor then jumps past the busy interval plus the buffer.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;
use crate::policy::WorkingHoursPolicy;

/// A bookable slot. Only valid against the event set it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Parameters of one sweep.
#[derive(Debug, Clone)]
pub struct SlotQuery<'a> {
    pub window: TimeInterval,
    /// Slot length; positive and no longer than the window.
    pub duration: Duration,
    pub policy: &'a WorkingHoursPolicy,
    /// Zone the working-hours policy is evaluated in.
    pub timezone: Tz,
    pub limit: usize,
}

/// Sweep `busy` and return up to `query.limit` slots in chronological order.
///
/// Intervals entirely outside the window are ignored; ties on start keep their
/// input order. A gap before a busy interval must fit the duration plus the
/// buffer; the trailing gap before the window end only needs the duration.
/// Every slot must also pass [`WorkingHoursPolicy::admits`].
pub fn sweep_free_slots(busy: &[TimeInterval], query: &SlotQuery<'_>) -> Vec<FreeSlot> {
    let window = query.window;
    let duration = query.duration;
    let buffer = query.policy.buffer();

    let mut intervals: Vec<TimeInterval> = busy
        .iter()
        .filter(|b| b.start < window.end && b.end > window.start)
        .copied()
        .collect();
    intervals.sort_by_key(|b| b.start);

    let mut slots = Vec::new();
    let mut cursor = window.start;

    for interval in &intervals {
        if slots.len() >= query.limit {
            break;
        }
        if cursor < interval.start
            && interval.start - cursor >= duration + buffer
            && query.policy.admits(cursor, cursor + duration, query.timezone)
        {
            slots.push(slot_at(cursor, duration));
        }
        cursor = cursor.max(interval.end + buffer);
    }

    // Trailing gap after the last busy interval.
    if cursor < window.end
        && window.end - cursor >= duration
        && query.policy.admits(cursor, cursor + duration, query.timezone)
    {
        slots.push(slot_at(cursor, duration));
    }

    slots.truncate(query.limit);
    slots
}

fn slot_at(start: DateTime<Utc>, duration: Duration) -> FreeSlot {
    FreeSlot {
        start,
        end: start + duration,
        duration_minutes: duration.num_minutes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn interval(start: &str, end: &str) -> TimeInterval {
        TimeInterval::new(utc(start), utc(end)).unwrap()
    }

    #[test]
    fn one_slot_per_gap() {
        let policy = WorkingHoursPolicy::default().with_buffer(0);
        let query = SlotQuery {
            window: interval("2026-03-02T09:00:00Z", "2026-03-02T17:00:00Z"),
            duration: Duration::minutes(30),
            policy: &policy,
            timezone: chrono_tz::UTC,
            limit: 10,
        };
        let busy = [interval("2026-03-02T13:00:00Z", "2026-03-02T14:00:00Z")];

        let slots = sweep_free_slots(&busy, &query);

        // The four-hour morning gap still produces a single slot.
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, utc("2026-03-02T09:00:00Z"));
        assert_eq!(slots[1].start, utc("2026-03-02T14:00:00Z"));
    }

    #[test]
    fn intervals_outside_window_are_ignored() {
        let policy = WorkingHoursPolicy::default();
        let query = SlotQuery {
            window: interval("2026-03-02T09:00:00Z", "2026-03-02T12:00:00Z"),
            duration: Duration::minutes(60),
            policy: &policy,
            timezone: chrono_tz::UTC,
            limit: 10,
        };
        let busy = [interval("2026-03-02T20:00:00Z", "2026-03-02T21:00:00Z")];

        let slots = sweep_free_slots(&busy, &query);

        assert_eq!(slots, vec![slot_at(utc("2026-03-02T09:00:00Z"), Duration::minutes(60))]);
    }
}
