//! Occurrence persistence.
//!
//! Occurrences are stored per course, grouped under the identity of the lesson
//! that produced them (the identity of the series' first occurrence).

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use rollcall_schedule::occurrence::{Occurrence, OccurrenceId};

use crate::error::ServiceResult;

/// Identity of a course owning a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub i64);

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Persistence contract for expanded occurrences.
pub trait OccurrenceStore: Send + Sync {
    /// Every occurrence of the course, ordered by start.
    fn load(&self, course: CourseId) -> impl Future<Output = ServiceResult<Vec<Occurrence>>> + Send;

    /// The occurrences stored under `lesson`, or `None` if there is no such lesson.
    fn lesson(
        &self,
        course: CourseId,
        lesson: OccurrenceId,
    ) -> impl Future<Output = ServiceResult<Option<Vec<Occurrence>>>> + Send;

    /// Stores `occurrences` under `lesson`, replacing whatever was there.
    fn put(
        &self,
        course: CourseId,
        lesson: OccurrenceId,
        occurrences: Vec<Occurrence>,
    ) -> impl Future<Output = ServiceResult<()>> + Send;

    /// Removes the lesson and returns how many occurrences it had.
    fn remove(
        &self,
        course: CourseId,
        lesson: OccurrenceId,
    ) -> impl Future<Output = ServiceResult<usize>> + Send;
}

#[derive(Debug, Clone)]
struct LessonRecord {
    id: OccurrenceId,
    occurrences: Vec<Occurrence>,
}

/// ## Summary
/// In-memory store keeping lessons in insertion order per course.
///
/// Each call is atomic under a `tokio::sync::RwLock`, but nothing spans calls:
/// a `load` followed by a `put` can interleave with other writers.
/// `SchedulingService` serializes its own check-then-write sequences.
#[derive(Debug, Default)]
pub struct MemoryStore {
    courses: RwLock<HashMap<CourseId, Vec<LessonRecord>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OccurrenceStore for MemoryStore {
    async fn load(&self, course: CourseId) -> ServiceResult<Vec<Occurrence>> {
        let courses = self.courses.read().await;
        let mut occurrences: Vec<Occurrence> = courses
            .get(&course)
            .into_iter()
            .flatten()
            .flat_map(|record| record.occurrences.iter().cloned())
            .collect();
        occurrences.sort_by_key(|o| o.start);
        Ok(occurrences)
    }

    async fn lesson(
        &self,
        course: CourseId,
        lesson: OccurrenceId,
    ) -> ServiceResult<Option<Vec<Occurrence>>> {
        let courses = self.courses.read().await;
        Ok(courses
            .get(&course)
            .and_then(|records| records.iter().find(|record| record.id == lesson))
            .map(|record| record.occurrences.clone()))
    }

    async fn put(
        &self,
        course: CourseId,
        lesson: OccurrenceId,
        occurrences: Vec<Occurrence>,
    ) -> ServiceResult<()> {
        let mut courses = self.courses.write().await;
        let records = courses.entry(course).or_default();
        if let Some(record) = records.iter_mut().find(|record| record.id == lesson) {
            record.occurrences = occurrences;
        } else {
            records.push(LessonRecord {
                id: lesson,
                occurrences,
            });
        }
        tracing::trace!(%course, %lesson, "Stored lesson occurrences");
        Ok(())
    }

    async fn remove(&self, course: CourseId, lesson: OccurrenceId) -> ServiceResult<usize> {
        let mut courses = self.courses.write().await;
        let Some(records) = courses.get_mut(&course) else {
            return Ok(0);
        };
        let Some(index) = records.iter().position(|record| record.id == lesson) else {
            return Ok(0);
        };
        let removed = records.remove(index);
        Ok(removed.occurrences.len())
    }
}
