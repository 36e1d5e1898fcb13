use std::sync::Arc;

use chrono::Weekday;
use rollcall_schedule::rule::RecurrenceRule;
use rollcall_service::store::MemoryStore;

use super::helpers::{COURSE, at, calendar, date, scheduling, weekly_algebra};

/// ## Summary
/// A week view holds only that week's occurrences and renders them on the grid.
#[test_log::test(tokio::test)]
async fn week_returns_occurrences_of_that_week() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule algebra");
    service
        .schedule(COURSE, &RecurrenceRule::once("Art", at(13, 23, 30), 60))
        .await
        .expect("schedule art");

    // 2024-01-10 is a Wednesday; its week runs Sunday 7th through Saturday 13th.
    let week = calendar(&store, at(1, 0, 0))
        .week(COURSE, date(2024, 1, 10))
        .await
        .expect("load week");

    assert_eq!(week.week_start, date(2024, 1, 7));
    assert_eq!(
        week.occurrences.iter().map(|o| o.start).collect::<Vec<_>>(),
        vec![at(8, 10, 0), at(13, 23, 30)]
    );

    let grid = week.grid();
    assert_eq!(grid.cell(Weekday::Mon, 10).expect("cell").occurrences.len(), 1);
    assert_eq!(grid.cell(Weekday::Sat, 23).expect("cell").occurrences.len(), 1);
}

#[test_log::test(tokio::test)]
async fn next_lesson_skips_running_lesson() {
    let store = Arc::new(MemoryStore::new());
    scheduling(&store)
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule algebra");

    let during = calendar(&store, at(8, 10, 30))
        .next_lesson(COURSE)
        .await
        .expect("next lesson");
    assert_eq!(during.expect("a later lesson").start, at(15, 10, 0));

    let after = calendar(&store, at(15, 10, 0))
        .next_lesson(COURSE)
        .await
        .expect("next lesson");
    assert!(after.is_none());
}
