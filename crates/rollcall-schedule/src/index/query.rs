use chrono::NaiveDateTime;
use serde::Serialize;

use crate::occurrence::Occurrence;

/// Where an occurrence sits relative to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceStatus {
    Past,
    Active,
    Upcoming,
}

/// Classifies `occurrence` at `instant`; both endpoints count as active.
#[must_use]
pub fn classify(occurrence: &Occurrence, instant: NaiveDateTime) -> OccurrenceStatus {
    if instant < occurrence.start {
        OccurrenceStatus::Upcoming
    } else if instant > occurrence.end {
        OccurrenceStatus::Past
    } else {
        OccurrenceStatus::Active
    }
}

/// ## Summary
/// True iff some occurrence satisfies `start <= instant <= end`.
///
/// This is the attendance window: recording is permitted exactly while it holds.
#[must_use]
pub fn is_active_at(occurrences: &[Occurrence], instant: NaiveDateTime) -> bool {
    occurrences.iter().any(|o| o.contains(instant))
}

/// The earliest-starting occurrence active at `instant`.
#[must_use]
pub fn active_at(occurrences: &[Occurrence], instant: NaiveDateTime) -> Option<&Occurrence> {
    occurrences
        .iter()
        .filter(|o| o.contains(instant))
        .min_by_key(|o| o.start)
}

/// ## Summary
/// The occurrence with the smallest `start` strictly after `instant`.
///
/// An occurrence that is active at `instant` is never returned. Ties go to the
/// first in slice order.
#[must_use]
pub fn next_occurrence_after(
    occurrences: &[Occurrence],
    instant: NaiveDateTime,
) -> Option<&Occurrence> {
    occurrences
        .iter()
        .filter(|o| o.start > instant)
        .min_by_key(|o| o.start)
}

/// ## Summary
/// Occurrences whose start or end falls within `[cell_start, cell_end]`.
///
/// A lesson spanning several cells without either endpoint in a middle cell is
/// not returned for that cell.
#[must_use]
pub fn occurrences_intersecting(
    occurrences: &[Occurrence],
    cell_start: NaiveDateTime,
    cell_end: NaiveDateTime,
) -> Vec<&Occurrence> {
    occurrences
        .iter()
        .filter(|o| o.span().touches(cell_start, cell_end))
        .collect()
}
