//! Point-in-time and interval queries over a set of occurrences.
//!
//! None of these queries fail: "no lesson" is an ordinary answer, returned as
//! `None`, `false` or an empty list.

mod pattern;
mod query;


pub use pattern::is_within_repeating_pattern;
pub use query::{
    OccurrenceStatus, active_at, classify, is_active_at, next_occurrence_after,
    occurrences_intersecting,
};
