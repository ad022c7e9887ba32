//! Timestamp normalization and interval predicates.
//!
//! Every instant that enters interval arithmetic passes through
//! [`Timestamp::normalize`] first, so a naive wall-clock time is never compared
//! with an aware one. Naive values are localized in the caller's default zone;
//! date-only values (all-day events) become local midnight in that zone.

use std::str::FromStr;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{Result, SchedulerError};

/// A point in time as it arrives from a caller or an event source, before
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Carries its own UTC offset.
    Aware(DateTime<FixedOffset>),
    /// Wall-clock time with no zone attached.
    Naive(NaiveDateTime),
    /// Date-only value, as used by all-day events.
    Date(NaiveDate),
}

impl Timestamp {
    /// Parse an ISO-8601 string.
    ///
    /// Accepts RFC 3339 (`2026-03-02T09:00:00+05:30`, `2026-03-02T09:00:00Z`),
    /// naive date-times with or without seconds (`2026-03-02T09:00`), and
    /// date-only values (`2026-03-02`).
    ///
    /// # Errors
    /// Returns `SchedulerError::InvalidTimestamp` if none of the formats match.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Aware(dt));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::Naive(ndt));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|_| SchedulerError::InvalidTimestamp(s.to_string()))
    }

    /// Resolve to a UTC instant, localizing naive and date-only values in `tz`.
    ///
    /// # Errors
    /// Returns `SchedulerError::NonexistentLocalTime` when a naive time falls in
    /// a DST gap and `dst` is [`DstPolicy::Reject`].
    pub fn normalize(&self, tz: Tz, dst: DstPolicy) -> Result<DateTime<Utc>> {
        match self {
            Self::Aware(dt) => Ok(dt.with_timezone(&Utc)),
            Self::Naive(ndt) => localize(*ndt, tz, dst),
            Self::Date(date) => localize(date.and_time(NaiveTime::MIN), tz, dst),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

impl FromStr for Timestamp {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Aware(dt.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Aware(dt)
    }
}

impl From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Aware(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(ndt: NaiveDateTime) -> Self {
        Self::Naive(ndt)
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// Interpret a wall-clock time in `tz`.
///
/// Ambiguous times resolve to the earlier instant. Times inside a DST gap are
/// handled according to `dst`: `ShiftForward` reads them with the offset in
/// effect before the gap, which lands them the same distance past the gap.
pub fn localize(naive: NaiveDateTime, tz: Tz, dst: DstPolicy) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => match dst {
            DstPolicy::Reject => Err(SchedulerError::NonexistentLocalTime(format!(
                "{} in {}",
                naive, tz
            ))),
            DstPolicy::ShiftForward => {
                let before = tz
                    .offset_from_local_datetime(&(naive - Duration::days(1)))
                    .earliest()
                    .ok_or_else(|| {
                        SchedulerError::NonexistentLocalTime(format!("{} in {}", naive, tz))
                    })?
                    .fix();
                let utc = naive - Duration::seconds(i64::from(before.local_minus_utc()));
                Ok(Utc.from_utc_datetime(&utc))
            }
        },
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SchedulerError::InvalidTimezone(name.to_string()))
}

/// Re-express an instant in another IANA zone.
///
/// # Errors
/// Returns `SchedulerError::InvalidTimezone` if `target` is not a known zone.
pub fn convert_to_timezone(instant: DateTime<Utc>, target: &str) -> Result<DateTime<Tz>> {
    let tz = parse_timezone(target)?;
    Ok(instant.with_timezone(&tz))
}

/// A half-open `[start, end)` range of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// # Errors
    /// Returns `SchedulerError::InvalidInput` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(SchedulerError::InvalidInput(format!(
                "interval start {} must be before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Strict overlap: intervals that only touch (`a.end == b.start`) do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The shared part of two overlapping intervals, or `None` if they do not
    /// strictly overlap.
    pub fn overlap(&self, other: &TimeInterval) -> Option<TimeInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeInterval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn parses_all_three_shapes() {
        assert!(matches!(
            Timestamp::parse("2026-03-02T09:00:00Z").unwrap(),
            Timestamp::Aware(_)
        ));
        assert!(matches!(
            Timestamp::parse("2026-03-02T09:00").unwrap(),
            Timestamp::Naive(_)
        ));
        assert!(matches!(
            Timestamp::parse("2026-03-02").unwrap(),
            Timestamp::Date(_)
        ));
        assert!(Timestamp::parse("next tuesday").is_err());
    }

    #[test]
    fn naive_is_localized_in_default_zone() {
        let ts = Timestamp::parse("2026-03-02T09:00:00").unwrap();
        let got = ts.normalize(chrono_tz::Asia::Kolkata, DstPolicy::default()).unwrap();
        assert_eq!(got, utc("2026-03-02T03:30:00Z"));
    }

    #[test]
    fn all_day_is_local_midnight() {
        let ts = Timestamp::parse("2026-03-02").unwrap();
        let got = ts
            .normalize(chrono_tz::America::New_York, DstPolicy::default())
            .unwrap();
        assert_eq!(got, utc("2026-03-02T05:00:00Z"));
    }

    #[test]
    fn dst_gap_shifts_forward_or_rejects() {
        // 2026-03-08 02:30 does not exist in New York.
        let ts = Timestamp::parse("2026-03-08T02:30:00").unwrap();
        let shifted = ts
            .normalize(chrono_tz::America::New_York, DstPolicy::ShiftForward)
            .unwrap();
        // Read with EST (-05:00) → 07:30Z, which is 03:30 EDT.
        assert_eq!(shifted, utc("2026-03-08T07:30:00Z"));

        let rejected = ts.normalize(chrono_tz::America::New_York, DstPolicy::Reject);
        assert!(matches!(
            rejected,
            Err(SchedulerError::NonexistentLocalTime(_))
        ));
    }

    #[test]
    fn ambiguous_time_takes_earlier_instant() {
        // 2026-11-01 01:30 happens twice in New York; EDT comes first.
        let ts = Timestamp::parse("2026-11-01T01:30:00").unwrap();
        let got = ts
            .normalize(chrono_tz::America::New_York, DstPolicy::default())
            .unwrap();
        assert_eq!(got, utc("2026-11-01T05:30:00Z"));
    }

    #[test]
    fn converts_between_zones() {
        let local = convert_to_timezone(utc("2026-03-02T14:00:00Z"), "America/New_York").unwrap();
        assert_eq!(local.format("%H:%M").to_string(), "09:00");
        assert!(convert_to_timezone(utc("2026-03-02T14:00:00Z"), "Not/AZone").is_err());
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = TimeInterval::new(utc("2026-03-02T09:00:00Z"), utc("2026-03-02T10:00:00Z")).unwrap();
        let b = TimeInterval::new(utc("2026-03-02T10:00:00Z"), utc("2026-03-02T11:00:00Z")).unwrap();
        assert!(!a.overlaps(&b));
        assert_eq!(a.overlap(&b), None);
    }

    #[test]
    fn empty_interval_is_rejected() {
        let t = utc("2026-03-02T09:00:00Z");
        assert!(TimeInterval::new(t, t).is_err());
    }
}
