//! Attendance-window enforcement.
//!
//! Attendance may be recorded only while a lesson of the course is active, i.e.
//! `start <= now <= end` for some stored occurrence.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_core::config::AttendanceConfig;
use rollcall_core::constants::ATTENDANCE_ROUTE_PREFIX;
use rollcall_core::error::CoreError;
use rollcall_schedule::index::{active_at, next_occurrence_after};
use rollcall_schedule::occurrence::{Occurrence, OccurrenceId};

use crate::clock::Clock;
use crate::error::ServiceResult;
use crate::store::{CourseId, OccurrenceStore};

/// Whether attendance can be recorded for a course right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AttendanceWindow {
    Open(Occurrence),
    Closed { next: Option<Occurrence> },
}

impl AttendanceWindow {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// A short-lived attendance link handed to students as a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePass {
    pub link_id: Uuid,
    pub lesson_id: OccurrenceId,
    pub issued_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl AttendancePass {
    /// Relative URL path students open to record attendance.
    #[must_use]
    pub fn link_path(&self) -> String {
        format!("{ATTENDANCE_ROUTE_PREFIX}/{}", self.link_id)
    }

    #[must_use]
    pub fn is_valid_at(&self, instant: NaiveDateTime) -> bool {
        instant < self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    Valid,
    Expired,
}

/// Outcome of a student asking for a face-match photo capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PhotoRequestDecision {
    Allowed(Occurrence),
    LimitExceeded { limit: u32 },
    LessonInactive,
}

/// One row of a student's attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSlot {
    pub date: NaiveDate,
    /// Time the lesson ends; attendance can no longer be recorded after it.
    pub close: NaiveDateTime,
    pub present: bool,
}

/// ## Summary
/// Answers attendance questions for a course against its stored occurrences.
#[derive(Debug)]
pub struct AttendanceService<S, C> {
    store: Arc<S>,
    clock: C,
    config: AttendanceConfig,
}

impl<S: OccurrenceStore, C: Clock> AttendanceService<S, C> {
    #[must_use]
    pub const fn new(store: Arc<S>, clock: C, config: AttendanceConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// ## Summary
    /// The attendance window of `course` at the current instant.
    ///
    /// A closed window is not an error; it carries the next lesson, if any.
    ///
    /// ## Errors
    /// Returns an error if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn window(&self, course: CourseId) -> ServiceResult<AttendanceWindow> {
        let now = self.clock.now();
        let occurrences = self.store.load(course).await?;

        let window = match active_at(&occurrences, now) {
            Some(active) => AttendanceWindow::Open(active.clone()),
            None => AttendanceWindow::Closed {
                next: next_occurrence_after(&occurrences, now).cloned(),
            },
        };
        tracing::debug!(%now, open = window.is_open(), "Resolved attendance window");
        Ok(window)
    }

    /// ## Summary
    /// Issues a pass for `lesson_id` valid for `attendance.pass_minutes`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvariantViolation` if the expiry is not representable.
    pub fn issue_pass(&self, lesson_id: OccurrenceId) -> ServiceResult<AttendancePass> {
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(TimeDelta::minutes(i64::from(self.config.pass_minutes)))
            .ok_or(CoreError::InvariantViolation(
                "attendance pass expiry overflows the calendar",
            ))?;

        let pass = AttendancePass {
            link_id: Uuid::new_v4(),
            lesson_id,
            issued_at,
            expires_at,
        };
        tracing::info!(%lesson_id, link = %pass.link_path(), %expires_at, "Issued attendance pass");
        Ok(pass)
    }

    #[must_use]
    pub fn redeem_pass(&self, pass: &AttendancePass) -> PassStatus {
        if pass.is_valid_at(self.clock.now()) {
            PassStatus::Valid
        } else {
            tracing::debug!(link_id = %pass.link_id, "Attendance pass expired");
            PassStatus::Expired
        }
    }

    /// ## Summary
    /// Decides whether a student who has already made `request_count` photo
    /// requests may make another.
    ///
    /// The request limit is checked before the lesson window.
    ///
    /// ## Errors
    /// Returns an error if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn check_photo_request(
        &self,
        course: CourseId,
        request_count: u32,
    ) -> ServiceResult<PhotoRequestDecision> {
        let limit = self.config.max_photo_requests;
        if request_count > limit {
            tracing::warn!(limit, "Photo request limit exceeded");
            return Ok(PhotoRequestDecision::LimitExceeded { limit });
        }

        Ok(match self.window(course).await? {
            AttendanceWindow::Open(occurrence) => PhotoRequestDecision::Allowed(occurrence),
            AttendanceWindow::Closed { .. } => PhotoRequestDecision::LessonInactive,
        })
    }
}

/// One unmarked attendance slot per occurrence, in input order.
#[must_use]
pub fn roster_slots(occurrences: &[Occurrence]) -> Vec<AttendanceSlot> {
    occurrences
        .iter()
        .map(|o| AttendanceSlot {
            date: o.start.date(),
            close: o.end,
            present: false,
        })
        .collect()
}
