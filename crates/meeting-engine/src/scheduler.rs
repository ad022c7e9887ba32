//! The scheduling facade: fetches through an [`EventSource`] and runs the pure
//! free-slot, conflict and alternative computations over the result.
//!
//! Every call re-fetches; nothing is cached between calls. Results are
//! snapshots and can race with concurrent writes to the underlying calendars.

use chrono::{DateTime, Duration, Utc};

use crate::alternatives;
use crate::config::{FetchFailurePolicy, SchedulerConfig};
use crate::conflict::{self, ConflictReport};
use crate::error::{Result, SchedulerError};
use crate::event::{BusyInterval, CalendarEvent};
use crate::freebusy::{self, FreeSlot, SlotQuery};
use crate::interval::{TimeInterval, Timestamp};
use crate::policy::WorkingHoursPolicy;
use crate::source::EventSource;
use crate::timezone::{self, OptimalTime};

pub struct Scheduler<S> {
    source: S,
    config: SchedulerConfig,
}

impl<S: EventSource> Scheduler<S> {
    pub fn new(source: S, config: SchedulerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Resolve a caller-supplied timestamp with the configured zone and DST policy.
    pub fn normalize(&self, ts: impl Into<Timestamp>) -> Result<DateTime<Utc>> {
        ts.into()
            .normalize(self.config.timezone, self.config.dst_policy)
    }

    /// Find up to `max_slots` free slots of `duration_minutes` in `[start, end]`
    /// across `calendar_ids`, under the configured working hours.
    ///
    /// An empty `calendar_ids` means the default calendar. A busy interval on
    /// any listed calendar blocks that time for all of them.
    ///
    /// # Errors
    /// - `SchedulerError::InvalidInput` if `duration_minutes <= 0` or longer than
    ///   the window, `start >= end`, or a calendar id is blank. No fetch happens
    ///   in that case.
    /// - `SchedulerError::Adapter` if a fetch fails under `FetchFailurePolicy::FailClosed`.
    pub fn find_free_slots(
        &self,
        start: impl Into<Timestamp>,
        end: impl Into<Timestamp>,
        duration_minutes: i64,
        calendar_ids: &[&str],
    ) -> Result<Vec<FreeSlot>> {
        self.find_free_slots_with_policy(
            start,
            end,
            duration_minutes,
            calendar_ids,
            &self.config.working_hours,
        )
    }

    /// [`Self::find_free_slots`] with a per-call working-hours override.
    pub fn find_free_slots_with_policy(
        &self,
        start: impl Into<Timestamp>,
        end: impl Into<Timestamp>,
        duration_minutes: i64,
        calendar_ids: &[&str],
        policy: &WorkingHoursPolicy,
    ) -> Result<Vec<FreeSlot>> {
        if duration_minutes <= 0 {
            return Err(SchedulerError::InvalidInput(format!(
                "duration must be positive, got {} minutes",
                duration_minutes
            )));
        }
        policy.validate()?;
        let window = TimeInterval::new(self.normalize(start)?, self.normalize(end)?)?;
        let duration = Duration::try_minutes(duration_minutes)
            .filter(|d| *d <= window.end - window.start)
            .ok_or_else(|| {
                SchedulerError::InvalidInput(format!(
                    "duration of {} minutes does not fit in the search window",
                    duration_minutes
                ))
            })?;
        let calendars = self.resolve_calendars(calendar_ids)?;

        let busy: Vec<TimeInterval> = self
            .fetch_busy(&calendars, window)?
            .into_iter()
            .map(|b| b.interval)
            .collect();

        let slots = freebusy::sweep_free_slots(
            &busy,
            &SlotQuery {
                window,
                duration,
                policy,
                timezone: self.config.timezone,
                limit: self.config.max_slots,
            },
        );
        tracing::debug!(
            busy = busy.len(),
            slots = slots.len(),
            duration_minutes,
            "free-slot search complete"
        );
        Ok(slots)
    }

    /// Report existing events on `calendar_ids` that strictly overlap `proposed`.
    ///
    /// Each calendar is fetched over the proposal padded by
    /// `conflict_padding_minutes` on both sides; touching events are fetched but
    /// never reported. An empty `calendar_ids` means the default calendar.
    ///
    /// # Errors
    /// - `SchedulerError::InvalidInput` if `proposed` does not start before it ends.
    /// - `SchedulerError::Adapter` if a fetch fails under `FetchFailurePolicy::FailClosed`.
    pub fn detect_conflicts(
        &self,
        proposed: &CalendarEvent,
        calendar_ids: &[&str],
    ) -> Result<Vec<ConflictReport>> {
        proposed.validate()?;
        let calendars = self.resolve_calendars(calendar_ids)?;

        let padding = Duration::minutes(i64::from(self.config.conflict_padding_minutes));
        let window = TimeInterval::new(proposed.start - padding, proposed.end + padding)?;
        let busy = self.fetch_busy(&calendars, window)?;

        let conflicts = conflict::find_conflicts(&proposed.interval(), &busy);
        tracing::debug!(
            checked = busy.len(),
            conflicts = conflicts.len(),
            "conflict check complete"
        );
        Ok(conflicts)
    }

    /// Propose up to `num_suggestions` copies of `proposed` moved into free slots.
    ///
    /// Searches the proposal's own calendar from the working-hours opening on
    /// the proposal's local day, for `alternatives_horizon_days`, keeping the
    /// original duration in whole minutes. Fewer results than requested is not
    /// an error.
    pub fn suggest_alternatives(
        &self,
        proposed: &CalendarEvent,
        num_suggestions: usize,
    ) -> Result<Vec<CalendarEvent>> {
        self.suggest_alternatives_with_policy(proposed, num_suggestions, &self.config.working_hours)
    }

    /// [`Self::suggest_alternatives`] with a per-call working-hours override.
    pub fn suggest_alternatives_with_policy(
        &self,
        proposed: &CalendarEvent,
        num_suggestions: usize,
        policy: &WorkingHoursPolicy,
    ) -> Result<Vec<CalendarEvent>> {
        self.suggest_on(proposed, &[], num_suggestions, policy)
    }

    /// [`Self::suggest_alternatives`] searching every calendar in `calendar_ids`
    /// instead of only the proposal's own.
    ///
    /// Pass the same list given to [`Self::detect_conflicts`] so a suggestion
    /// re-checked against those calendars reports no conflicts. An empty list
    /// falls back to the proposal's calendar.
    pub fn suggest_alternatives_across(
        &self,
        proposed: &CalendarEvent,
        calendar_ids: &[&str],
        num_suggestions: usize,
    ) -> Result<Vec<CalendarEvent>> {
        self.suggest_on(
            proposed,
            calendar_ids,
            num_suggestions,
            &self.config.working_hours,
        )
    }

    fn suggest_on(
        &self,
        proposed: &CalendarEvent,
        calendar_ids: &[&str],
        num_suggestions: usize,
        policy: &WorkingHoursPolicy,
    ) -> Result<Vec<CalendarEvent>> {
        proposed.validate()?;
        policy.validate()?;
        if num_suggestions == 0 {
            return Ok(Vec::new());
        }

        let window = alternatives::search_window(
            proposed,
            policy,
            self.config.timezone,
            self.config.dst_policy,
            self.config.alternatives_horizon_days,
        )?;
        let calendars: Vec<&str> = if !calendar_ids.is_empty() {
            calendar_ids.to_vec()
        } else if proposed.calendar_id.is_empty() {
            Vec::new()
        } else {
            vec![proposed.calendar_id.as_str()]
        };

        let slots = self.find_free_slots_with_policy(
            window.start,
            window.end,
            proposed.duration_minutes(),
            &calendars,
            policy,
        )?;
        alternatives::alternatives_from_slots(proposed, &slots, num_suggestions)
    }

    /// [`timezone::find_optimal_times`] under the configured working hours.
    pub fn find_optimal_times<T: AsRef<str>>(
        &self,
        participant_timezones: &[T],
        reference: DateTime<Utc>,
    ) -> Result<Vec<OptimalTime>> {
        self.find_optimal_times_with_policy(
            participant_timezones,
            reference,
            &self.config.working_hours,
        )
    }

    /// [`Self::find_optimal_times`] with a per-call working-hours override.
    ///
    /// Only the policy's hours matter here; weekdays and buffer are ignored.
    pub fn find_optimal_times_with_policy<T: AsRef<str>>(
        &self,
        participant_timezones: &[T],
        reference: DateTime<Utc>,
        policy: &WorkingHoursPolicy,
    ) -> Result<Vec<OptimalTime>> {
        timezone::find_optimal_times(
            participant_timezones,
            (policy.start_hour, policy.end_hour),
            reference,
        )
    }

    fn resolve_calendars<'a>(&'a self, calendar_ids: &[&'a str]) -> Result<Vec<&'a str>> {
        if calendar_ids.is_empty() {
            return Ok(vec![self.config.default_calendar.as_str()]);
        }
        if calendar_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(SchedulerError::InvalidInput(
                "calendar ids must not be blank".to_string(),
            ));
        }
        Ok(calendar_ids.to_vec())
    }

    /// Fetch and normalize every calendar in listed order, applying the
    /// configured fetch-failure policy.
    fn fetch_busy(&self, calendar_ids: &[&str], window: TimeInterval) -> Result<Vec<BusyInterval>> {
        let mut busy = Vec::new();
        for &calendar_id in calendar_ids {
            let raw = match self.source.fetch_events(
                calendar_id,
                window.start,
                window.end,
                self.config.max_results,
            ) {
                Ok(events) => events,
                Err(source) => match self.config.on_fetch_error {
                    FetchFailurePolicy::FailClosed => {
                        return Err(SchedulerError::Adapter {
                            calendar_id: calendar_id.to_string(),
                            source,
                        });
                    }
                    FetchFailurePolicy::FailOpen => {
                        tracing::warn!(
                            calendar_id,
                            error = %source,
                            "event fetch failed, treating calendar as free"
                        );
                        continue;
                    }
                },
            };
            tracing::debug!(
                calendar_id,
                events = raw.len(),
                start = %window.start,
                end = %window.end,
                "fetched events"
            );

            for event in &raw {
                if let Some(interval) = BusyInterval::from_raw(
                    event,
                    calendar_id,
                    self.config.timezone,
                    self.config.dst_policy,
                )? {
                    busy.push(interval);
                }
            }
        }
        Ok(busy)
    }
}
