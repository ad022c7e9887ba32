//! DST policies for localizing naive wall-clock times.

use serde::{Deserialize, Serialize};

/// Policy for naive local times that do not exist in the target zone
/// (e.g., 02:30 during a spring-forward transition).
///
/// Ambiguous local times (the repeated hour in autumn) always resolve to the
/// earlier of the two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Move the time forward by the size of the gap (02:30 becomes 03:30).
    #[default]
    ShiftForward,
    /// Fail with `SchedulerError::NonexistentLocalTime`.
    Reject,
}
