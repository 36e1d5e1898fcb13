//! Logical lessons: occurrences collapsed by title.
//!
//! Course views show one row per lesson with all of its dates, while the calendar
//! works with flat occurrences. Collapsing is by exact title match.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use rollcall_core::types::LessonColor;

use crate::occurrence::{Occurrence, OccurrenceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDate {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub color: LessonColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: OccurrenceId,
    pub title: String,
    pub dates: Vec<LessonDate>,
}

/// ## Summary
/// Collapses occurrences sharing an identical title into one lesson each.
///
/// The first occurrence seen for a title provides the lesson identity. Lessons
/// keep first-seen order and dates keep input order.
#[must_use]
pub fn group_by_title(occurrences: &[Occurrence]) -> Vec<Lesson> {
    let mut lessons: Vec<Lesson> = Vec::new();
    let mut by_title: HashMap<&str, usize> = HashMap::new();

    for occurrence in occurrences {
        let date = LessonDate {
            start: occurrence.start,
            end: occurrence.end,
            color: occurrence.color,
        };
        if let Some(&index) = by_title.get(occurrence.rule_title.as_str()) {
            lessons[index].dates.push(date);
        } else {
            by_title.insert(occurrence.rule_title.as_str(), lessons.len());
            lessons.push(Lesson {
                id: occurrence.id,
                title: occurrence.rule_title.clone(),
                dates: vec![date],
            });
        }
    }

    tracing::trace!(
        occurrences = occurrences.len(),
        lessons = lessons.len(),
        "Grouped occurrences by title"
    );
    lessons
}

/// Expands lessons back into one occurrence per date, each carrying the lesson id.
#[must_use]
pub fn flatten(lessons: &[Lesson]) -> Vec<Occurrence> {
    lessons
        .iter()
        .flat_map(|lesson| {
            lesson.dates.iter().map(|date| Occurrence {
                id: lesson.id,
                rule_title: lesson.title.clone(),
                start: date.start,
                end: date.end,
                color: date.color,
                repetition: None,
            })
        })
        .collect()
}
