use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

use rollcall_schedule::grid::{WeekGrid, week_start};
use rollcall_schedule::index::next_occurrence_after;
use rollcall_schedule::occurrence::Occurrence;

use crate::clock::Clock;
use crate::error::ServiceResult;
use crate::store::{CourseId, OccurrenceStore};

/// Occurrences touching the Sunday-to-Saturday week containing a day.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSchedule {
    pub week_start: NaiveDate,
    pub occurrences: Vec<Occurrence>,
}

impl WeekSchedule {
    #[must_use]
    pub fn grid(&self) -> WeekGrid<'_> {
        WeekGrid::build(&self.occurrences, self.week_start)
    }
}

#[derive(Debug)]
pub struct CalendarService<S, C> {
    store: Arc<S>,
    clock: C,
}

impl<S: OccurrenceStore, C: Clock> CalendarService<S, C> {
    #[must_use]
    pub const fn new(store: Arc<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// ## Summary
    /// The course's occurrences that start or end within the week containing `day`.
    ///
    /// ## Errors
    /// Returns an error if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn week(&self, course: CourseId, day: NaiveDate) -> ServiceResult<WeekSchedule> {
        let week_start = week_start(day);
        let from = week_start.and_time(NaiveTime::MIN);
        let to = from
            .checked_add_signed(TimeDelta::days(7) - TimeDelta::seconds(1))
            .unwrap_or(NaiveDateTime::MAX);

        let occurrences: Vec<Occurrence> = self
            .store
            .load(course)
            .await?
            .into_iter()
            .filter(|o| o.span().touches(from, to))
            .collect();

        tracing::debug!(%week_start, count = occurrences.len(), "Loaded week");
        Ok(WeekSchedule {
            week_start,
            occurrences,
        })
    }

    /// ## Summary
    /// The next lesson of the course starting strictly after now.
    ///
    /// ## Errors
    /// Returns an error if the store fails.
    pub async fn next_lesson(&self, course: CourseId) -> ServiceResult<Option<Occurrence>> {
        let occurrences = self.store.load(course).await?;
        Ok(next_occurrence_after(&occurrences, self.clock.now()).cloned())
    }
}
