//! Detect overlaps between a proposed event and existing busy intervals.
//!
//! Adjacent events (where one ends exactly when another starts) are NOT conflicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{BusyInterval, CalendarEvent};
use crate::interval::TimeInterval;

/// One existing event that overlaps a proposed event.
///
/// `overlap_start < overlap_end` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub calendar_id: String,
    pub conflicting_event: CalendarEvent,
    pub overlap_start: DateTime<Utc>,
    pub overlap_end: DateTime<Utc>,
}

impl ConflictReport {
    pub fn overlap_minutes(&self) -> i64 {
        (self.overlap_end - self.overlap_start).num_minutes()
    }
}

/// Report every busy interval that strictly overlaps `proposed`, in input order.
///
/// Two intervals overlap iff `proposed.start < existing.end && proposed.end > existing.start`.
/// The overlap runs from `max(starts)` to `min(ends)`.
pub fn find_conflicts(proposed: &TimeInterval, existing: &[BusyInterval]) -> Vec<ConflictReport> {
    existing
        .iter()
        .filter_map(|busy| {
            let overlap = proposed.overlap(&busy.interval)?;
            Some(ConflictReport {
                calendar_id: busy.calendar_id.clone(),
                conflicting_event: busy.event.clone(),
                overlap_start: overlap.start,
                overlap_end: overlap.end,
            })
        })
        .collect()
}
