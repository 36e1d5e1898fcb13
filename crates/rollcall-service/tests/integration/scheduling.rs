use std::sync::Arc;

use rollcall_schedule::rule::{Frequency, RecurrenceRule};
use rollcall_service::error::ServiceError;
use rollcall_service::store::{CourseId, MemoryStore, OccurrenceStore};

use super::helpers::{COURSE, at, date, nz, scheduling, weekly_algebra};

/// ## Summary
/// A weekly rule is stored as one lesson keyed by its first occurrence.
#[test_log::test(tokio::test)]
async fn schedule_stores_expanded_series() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);

    let lesson = service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule weekly lesson");

    assert_eq!(
        lesson.occurrences.iter().map(|o| o.start).collect::<Vec<_>>(),
        vec![at(1, 10, 0), at(8, 10, 0), at(15, 10, 0)]
    );
    assert_eq!(lesson.lesson_id, lesson.occurrences[0].id);

    let stored = store
        .lesson(COURSE, lesson.lesson_id)
        .await
        .expect("load lesson")
        .expect("lesson exists");
    assert_eq!(stored, lesson.occurrences);
}

/// ## Summary
/// An overlapping rule is rejected and leaves the course untouched.
#[test_log::test(tokio::test)]
async fn schedule_rejects_conflicting_rule() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    let first = service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule first lesson");

    // Overlaps the 2024-01-15 occurrence only.
    let clash = RecurrenceRule::once("Art", at(15, 10, 30), 60);
    let err = service
        .schedule(COURSE, &clash)
        .await
        .expect_err("overlap must be rejected");

    let ServiceError::Conflict(conflict) = err else {
        panic!("expected a conflict, got {err:?}");
    };
    assert_eq!(conflict.conflicting, vec![first.occurrences[2].id]);
    assert_eq!(store.load(COURSE).await.expect("load").len(), 3);
}

/// ## Summary
/// Back-to-back lessons do not conflict, and other courses are never consulted.
#[test_log::test(tokio::test)]
async fn schedule_allows_adjacent_and_other_course() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule first lesson");

    service
        .schedule(COURSE, &RecurrenceRule::once("Art", at(1, 11, 0), 45))
        .await
        .expect("adjacent lesson is allowed");
    service
        .schedule(CourseId(7), &weekly_algebra())
        .await
        .expect("same slot in another course is allowed");

    assert_eq!(store.load(COURSE).await.expect("load").len(), 4);
}

/// ## Summary
/// Invalid rules fail validation before anything is expanded.
#[test_log::test(tokio::test)]
async fn schedule_validates_rule() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);

    let too_short = RecurrenceRule::once("Algebra", at(1, 10, 0), 1);
    let mut open_ended = weekly_algebra();
    open_ended.end_date = None;

    for rule in [too_short, open_ended] {
        let err = service
            .schedule(COURSE, &rule)
            .await
            .expect_err("invalid rule must be rejected");
        assert!(matches!(err, ServiceError::ScheduleError(_)), "{err:?}");
    }
    assert!(store.load(COURSE).await.expect("load").is_empty());
}

/// ## Summary
/// Rescheduling keeps the lesson identity and ignores the lesson's own old slots.
#[test_log::test(tokio::test)]
async fn reschedule_replaces_series_in_place() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    let original = service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule lesson");

    // Shifted by half an hour, so every new slot overlaps an old one.
    let moved = RecurrenceRule::once("Algebra", at(1, 10, 30), 60).repeating_until(
        Frequency::Daily,
        nz(7),
        date(2024, 1, 22),
    );
    let rescheduled = service
        .reschedule(COURSE, original.lesson_id, &moved)
        .await
        .expect("reschedule lesson");

    assert_eq!(rescheduled.lesson_id, original.lesson_id);
    assert_eq!(rescheduled.occurrences[0].id, original.lesson_id);
    let stored = store.load(COURSE).await.expect("load");
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|o| o.start.format("%H:%M").to_string() == "10:30"));
}

/// ## Summary
/// Rescheduling still rejects overlaps with other lessons.
#[test_log::test(tokio::test)]
async fn reschedule_conflicts_with_other_lessons() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule algebra");
    let art = service
        .schedule(COURSE, &RecurrenceRule::once("Art", at(2, 10, 0), 60))
        .await
        .expect("schedule art");

    let err = service
        .reschedule(COURSE, art.lesson_id, &RecurrenceRule::once("Art", at(8, 10, 15), 60))
        .await
        .expect_err("moved lesson overlaps algebra");
    assert!(matches!(err, ServiceError::Conflict(_)));

    let kept = store
        .lesson(COURSE, art.lesson_id)
        .await
        .expect("load")
        .expect("art still stored");
    assert_eq!(kept, art.occurrences);
}

#[test_log::test(tokio::test)]
async fn reschedule_unknown_lesson_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    let other = scheduling(&Arc::new(MemoryStore::new()))
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule in separate store");

    let err = service
        .reschedule(COURSE, other.lesson_id, &weekly_algebra())
        .await
        .expect_err("lesson does not exist here");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test_log::test(tokio::test)]
async fn unschedule_removes_whole_series() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    let lesson = service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule lesson");

    let removed = service
        .unschedule(COURSE, lesson.lesson_id)
        .await
        .expect("unschedule lesson");
    assert_eq!(removed, 3);
    assert!(store.load(COURSE).await.expect("load").is_empty());

    let err = service
        .unschedule(COURSE, lesson.lesson_id)
        .await
        .expect_err("already removed");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

/// ## Summary
/// Lessons group the stored occurrences by title.
#[test_log::test(tokio::test)]
async fn lessons_groups_by_title() {
    let store = Arc::new(MemoryStore::new());
    let service = scheduling(&store);
    let algebra = service
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("schedule algebra");
    service
        .schedule(COURSE, &RecurrenceRule::once("Art", at(3, 14, 0), 90))
        .await
        .expect("schedule art");

    let lessons = service.lessons(COURSE).await.expect("list lessons");

    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].title, "Algebra");
    assert_eq!(lessons[0].id, algebra.lesson_id);
    assert_eq!(lessons[0].dates.len(), 3);
    assert_eq!(lessons[1].title, "Art");
}

/// ## Summary
/// Concurrent requests for the same slot store exactly one lesson.
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn concurrent_overlapping_schedules_store_one_lesson() {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(scheduling(&store));

    let tasks: Vec<_> = (0..8)
        .map(|n| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let rule = RecurrenceRule::once(format!("Lesson {n}"), at(3, 10, 0), 60);
                service.schedule(COURSE, &rule).await
            })
        })
        .collect();

    let mut scheduled = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.expect("task completes") {
            Ok(_) => scheduled += 1,
            Err(ServiceError::Conflict(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(scheduled, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.load(COURSE).await.expect("load").len(), 1);
}
