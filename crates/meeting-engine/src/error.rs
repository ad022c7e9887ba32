//! Error types for meeting-engine operations.

use thiserror::Error;

use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Rejected before any calendar is queried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A naive local time that falls inside a DST gap.
    #[error("Nonexistent local time: {0}")]
    NonexistentLocalTime(String),

    #[error("Event source failed for calendar '{calendar_id}': {source}")]
    Adapter {
        calendar_id: String,
        #[source]
        source: SourceError,
    },

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
