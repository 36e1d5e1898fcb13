//! Lesson scheduling engine.
//!
//! ## Module Organization
//!
//! - `rule`: the user-facing recurrence rule and its validation limits
//! - `occurrence`: concrete, materialized lesson occurrences
//! - `expand`: rule expansion with overlap checking
//! - `index`: point-in-time and interval queries over occurrences
//! - `grid`: week view cells built from index queries
//! - `lesson`: grouping occurrences into logical lessons by title

pub mod error;
pub mod expand;
pub mod grid;
pub mod index;
pub mod lesson;
pub mod occurrence;
pub mod rule;

pub use error::{ConflictError, ScheduleError, ScheduleResult};
pub use expand::{RecurrenceExpander, expand};
pub use occurrence::{Occurrence, OccurrenceId, TimeSpan};
pub use rule::{Frequency, RecurrenceRule, RepetitionInfo, ScheduleLimits};
