//! Week view built from index queries.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use serde::Serialize;

use rollcall_core::constants::CALENDAR_CELL_SPAN_MINUTES;

use crate::index::{is_within_repeating_pattern, occurrences_intersecting};
use crate::occurrence::{Occurrence, TimeSpan};
use crate::rule::RecurrenceRule;

const HOURS_PER_DAY: u32 = 24;

/// One hour cell of the week view.
#[derive(Debug, Clone, Serialize)]
pub struct GridCell<'a> {
    pub hour: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub occurrences: Vec<&'a Occurrence>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridDay<'a> {
    pub date: NaiveDate,
    pub cells: Vec<GridCell<'a>>,
}

/// Seven days of hour cells, starting on Sunday.
#[derive(Debug, Clone, Serialize)]
pub struct WeekGrid<'a> {
    pub week_start: NaiveDate,
    pub days: Vec<GridDay<'a>>,
}

impl<'a> WeekGrid<'a> {
    /// ## Summary
    /// Builds the week containing `day`, filling each cell with the occurrences
    /// that start or end inside it.
    #[must_use]
    pub fn build(occurrences: &'a [Occurrence], day: NaiveDate) -> Self {
        let week_start = week_start(day);
        let days = week_start
            .iter_days()
            .take(7)
            .map(|date| GridDay {
                date,
                cells: day_cells(occurrences, date),
            })
            .collect();

        Self { week_start, days }
    }

    #[must_use]
    pub fn cell(&self, weekday: Weekday, hour: u32) -> Option<&GridCell<'a>> {
        let index = usize::try_from(weekday.num_days_from_sunday()).ok()?;
        self.days
            .get(index)?
            .cells
            .iter()
            .find(|cell| cell.hour == hour)
    }

    /// Total number of cell placements; a lesson touching two cells counts twice.
    #[must_use]
    pub fn placements(&self) -> usize {
        self.days
            .iter()
            .flat_map(|day| &day.cells)
            .map(|cell| cell.occurrences.len())
            .sum()
    }
}

fn day_cells(occurrences: &[Occurrence], date: NaiveDate) -> Vec<GridCell<'_>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..HOURS_PER_DAY)
        .filter_map(|hour| {
            let start = midnight.checked_add_signed(TimeDelta::hours(i64::from(hour)))?;
            let end = start.checked_add_signed(TimeDelta::minutes(CALENDAR_CELL_SPAN_MINUTES))?;
            Some(GridCell {
                hour,
                start,
                end,
                occurrences: occurrences_intersecting(occurrences, start, end),
            })
        })
        .collect()
}

/// The Sunday on or before `day`.
#[must_use]
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day.week(Weekday::Sun).first_day()
}

/// ## Summary
/// Where a lesson of `rule` would sit on `date`, if the rule's pattern lands there.
///
/// The projected lesson keeps the anchor's time of day and the rule's duration.
#[must_use]
pub fn preview_occurrence_on(rule: &RecurrenceRule, date: NaiveDate) -> Option<TimeSpan> {
    if !is_within_repeating_pattern(rule, date) {
        return None;
    }
    let start = date.and_time(rule.anchor_start.time());
    Some(TimeSpan::new(start, rule.end_for(start)?))
}
