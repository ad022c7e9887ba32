//! # meeting-engine
//!
//! Free-slot search, conflict detection and alternative-time suggestion for
//! meeting scheduling.
//!
//! The engine never stores calendar data. Callers inject an [`EventSource`],
//! and every operation fetches, normalizes to UTC, and computes over the
//! result. Working hours, buffer time and the default timezone come from an
//! explicit [`SchedulerConfig`].
//!
//! ## Modules
//!
//! - [`interval`]: timestamp parsing/normalization and interval predicates
//! - [`dst`]: how naive times inside DST gaps are resolved
//! - [`event`]: `CalendarEvent` and the `BusyInterval`s derived from source records
//! - [`source`]: the `EventSource` contract and an in-memory implementation
//! - [`policy`]: working hours, weekdays and buffer time
//! - [`config`]: `SchedulerConfig` and the fetch-failure policy
//! - [`freebusy`]: chronological sweep producing free slots
//! - [`conflict`]: strict-overlap conflict reports
//! - [`alternatives`]: substitute events for a conflicting proposal
//! - [`timezone`]: meeting-hour feasibility across participant zones
//! - [`recurrence`]: RRULE composition and validation
//! - [`scheduler`]: the `Scheduler` facade
//! - [`error`]: Error types

pub mod alternatives;
pub mod config;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod interval;
pub mod policy;
pub mod recurrence;
pub mod scheduler;
pub mod source;
pub mod timezone;

pub use config::{FetchFailurePolicy, SchedulerConfig};
pub use conflict::ConflictReport;
pub use dst::DstPolicy;
pub use error::SchedulerError;
pub use event::{BusyInterval, CalendarEvent, Reminder, ReminderMethod};
pub use freebusy::FreeSlot;
pub use interval::{convert_to_timezone, TimeInterval, Timestamp};
pub use policy::WorkingHoursPolicy;
pub use recurrence::{build_rrule, validate_rrule, Frequency, RecurrenceEnd};
pub use scheduler::Scheduler;
pub use source::{EventSource, MemorySource, RawEvent, SourceError};
pub use timezone::{find_optimal_times, OptimalTime, ParticipantTime};
