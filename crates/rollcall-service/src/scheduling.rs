//! Scheduling-form operations: create, edit and delete lessons of a course.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use rollcall_schedule::expand::RecurrenceExpander;
use rollcall_schedule::lesson::{Lesson, group_by_title};
use rollcall_schedule::occurrence::{Occurrence, OccurrenceId};
use rollcall_schedule::rule::{RecurrenceRule, ScheduleLimits};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{CourseId, OccurrenceStore};

/// Result of scheduling or rescheduling a lesson.
#[derive(Debug, Clone)]
pub struct ScheduledLesson {
    /// Identity the lesson's occurrences are stored under.
    pub lesson_id: OccurrenceId,
    pub occurrences: Vec<Occurrence>,
}

/// ## Summary
/// Validates and expands rules, then hands the result to the store.
///
/// A `ServiceError::Conflict` is the caller's cue to re-prompt for a different
/// time; nothing is stored in that case.
///
/// Conflict checking reads the course and writes the result in separate store
/// calls, so each check-then-write runs under an internal lock and two
/// overlapping lessons scheduled at once cannot both pass the check. This holds
/// for callers sharing one service; other writers to the same store are not
/// serialized against it.
#[derive(Debug)]
pub struct SchedulingService<S> {
    store: Arc<S>,
    limits: ScheduleLimits,
    writes: Mutex<()>,
}

impl<S: OccurrenceStore> SchedulingService<S> {
    #[must_use]
    pub fn new(store: Arc<S>, limits: ScheduleLimits) -> Self {
        Self {
            store,
            limits,
            writes: Mutex::new(()),
        }
    }

    /// ## Summary
    /// Schedules a new lesson from `rule`.
    ///
    /// ## Errors
    /// Returns an error if the rule is invalid, overlaps an occurrence already
    /// scheduled for the course, or the store fails.
    #[tracing::instrument(skip(self, rule), fields(title = %rule.title, anchor_start = %rule.anchor_start))]
    pub async fn schedule(
        &self,
        course: CourseId,
        rule: &RecurrenceRule,
    ) -> ServiceResult<ScheduledLesson> {
        rule.validate(&self.limits)?;

        let _write = self.writes.lock().await;
        let existing = self.store.load(course).await?;
        let occurrences = RecurrenceExpander::new(rule)
            .with_limits(&self.limits)
            .expand(&existing)?;
        let lesson_id = first_id(&occurrences)?;

        self.store
            .put(course, lesson_id, occurrences.clone())
            .await?;

        tracing::info!(%lesson_id, count = occurrences.len(), "Lesson scheduled");
        Ok(ScheduledLesson {
            lesson_id,
            occurrences,
        })
    }

    /// ## Summary
    /// Replaces every occurrence of `lesson_id` with a fresh expansion of `rule`.
    ///
    /// The lesson keeps its identity; the repeats get new ones. The lesson's own
    /// previous occurrences are not considered conflicts.
    ///
    /// ## Errors
    /// Returns `NotFound` if the lesson does not exist, and otherwise the same
    /// errors as [`Self::schedule`].
    #[tracing::instrument(skip(self, rule), fields(title = %rule.title, anchor_start = %rule.anchor_start))]
    pub async fn reschedule(
        &self,
        course: CourseId,
        lesson_id: OccurrenceId,
        rule: &RecurrenceRule,
    ) -> ServiceResult<ScheduledLesson> {
        rule.validate(&self.limits)?;

        let _write = self.writes.lock().await;
        let Some(previous) = self.store.lesson(course, lesson_id).await? else {
            return Err(ServiceError::NotFound(format!(
                "lesson {lesson_id} in course {course}"
            )));
        };
        let previous_ids: HashSet<OccurrenceId> = previous.iter().map(|o| o.id).collect();
        let existing: Vec<Occurrence> = self
            .store
            .load(course)
            .await?
            .into_iter()
            .filter(|o| !previous_ids.contains(&o.id))
            .collect();

        let occurrences = RecurrenceExpander::new(rule)
            .with_limits(&self.limits)
            .with_first_id(lesson_id)
            .expand(&existing)?;
        first_id(&occurrences)?;

        self.store
            .put(course, lesson_id, occurrences.clone())
            .await?;

        tracing::info!(
            replaced = previous.len(),
            count = occurrences.len(),
            "Lesson rescheduled"
        );
        Ok(ScheduledLesson {
            lesson_id,
            occurrences,
        })
    }

    /// ## Summary
    /// Deletes every occurrence of `lesson_id`.
    ///
    /// ## Errors
    /// Returns `NotFound` if the lesson had no occurrences, or a store error.
    #[tracing::instrument(skip(self))]
    pub async fn unschedule(&self, course: CourseId, lesson_id: OccurrenceId) -> ServiceResult<usize> {
        let _write = self.writes.lock().await;
        let removed = self.store.remove(course, lesson_id).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!(
                "lesson {lesson_id} in course {course}"
            )));
        }
        tracing::info!(removed, "Lesson unscheduled");
        Ok(removed)
    }

    /// ## Summary
    /// The course's occurrences collapsed into lessons by title.
    ///
    /// ## Errors
    /// Returns an error if the store fails.
    pub async fn lessons(&self, course: CourseId) -> ServiceResult<Vec<Lesson>> {
        let occurrences = self.store.load(course).await?;
        Ok(group_by_title(&occurrences))
    }
}

fn first_id(occurrences: &[Occurrence]) -> ServiceResult<OccurrenceId> {
    occurrences.first().map(|o| o.id).ok_or_else(|| {
        rollcall_schedule::error::ScheduleError::Validation(
            "lesson falls outside the representable calendar".to_string(),
        )
        .into()
    })
}
