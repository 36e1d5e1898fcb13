//! Materialized lesson occurrences.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_core::types::LessonColor;

use crate::rule::{RecurrenceRule, RepetitionInfo};

/// Identity of a stored occurrence.
///
/// All occurrences of one lesson share the lesson's identity once grouped;
/// freshly expanded repeats each get their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccurrenceId(Uuid);

impl OccurrenceId {
    /// Creates a new random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A wall-clock interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSpan {
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Strict overlap: spans that only touch at an endpoint do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Closed containment, both endpoints included.
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Whether either endpoint of `self` falls inside `[from, to]`.
    #[must_use]
    pub fn touches(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        let window = Self::new(from, to);
        window.contains(self.start) || window.contains(self.end)
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }
}

/// One concrete lesson on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub rule_title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub color: LessonColor,
    /// Set on the first occurrence of a repeating series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition: Option<RepetitionInfo>,
}

impl Occurrence {
    /// ## Summary
    /// Builds the occurrence of `rule` starting at `start`.
    ///
    /// Returns `None` if the end would overflow the calendar.
    #[must_use]
    pub fn from_rule(id: OccurrenceId, rule: &RecurrenceRule, start: NaiveDateTime) -> Option<Self> {
        Some(Self {
            id,
            rule_title: rule.title.clone(),
            start,
            end: rule.end_for(start)?,
            color: rule.color,
            repetition: None,
        })
    }

    #[must_use]
    pub const fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.span().overlaps(&other.span())
    }

    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.span().contains(instant)
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.span().duration()
    }

    /// Field-wise equality ignoring the identity.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        self.rule_title == other.rule_title
            && self.start == other.start
            && self.end == other.end
            && self.color == other.color
            && self.repetition == other.repetition
    }
}
