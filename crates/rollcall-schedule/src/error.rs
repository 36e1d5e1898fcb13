use chrono::NaiveDateTime;
use thiserror::Error;

use crate::occurrence::OccurrenceId;

/// A generated occurrence intersects occurrences that are already scheduled.
///
/// Expansion is all-or-nothing: when this is returned no occurrences were produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "lesson {title:?} from {start} to {end} overlaps {} scheduled occurrence(s)",
    .conflicting.len()
)]
pub struct ConflictError {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Identities of every existing occurrence the candidate overlaps.
    pub conflicting: Vec<OccurrenceId>,
}

/// Scheduling errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    CoreError(#[from] rollcall_core::error::CoreError),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
