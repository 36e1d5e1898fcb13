use std::sync::Arc;

use chrono::TimeDelta;
use rollcall_schedule::occurrence::OccurrenceId;
use rollcall_schedule::rule::RecurrenceRule;
use rollcall_service::attendance::{
    AttendanceWindow, PassStatus, PhotoRequestDecision, roster_slots,
};
use rollcall_service::store::MemoryStore;

use super::helpers::{COURSE, at, attendance, date, scheduling, weekly_algebra};

async fn seeded_store() -> Arc<MemoryStore> {
    seeded().await.0
}

async fn seeded() -> (Arc<MemoryStore>, OccurrenceId) {
    let store = Arc::new(MemoryStore::new());
    let lesson = scheduling(&store)
        .schedule(COURSE, &weekly_algebra())
        .await
        .expect("seed weekly lesson");
    (store, lesson.lesson_id)
}

/// ## Summary
/// The window is open on both endpoints of a lesson and closed just outside.
#[test_log::test(tokio::test)]
async fn window_follows_closed_interval() {
    let store = seeded_store().await;

    for now in [at(8, 10, 0), at(8, 10, 40), at(8, 11, 0)] {
        let window = attendance(&store, now)
            .window(COURSE)
            .await
            .expect("resolve window");
        let AttendanceWindow::Open(active) = window else {
            panic!("window should be open at {now}");
        };
        assert_eq!(active.start, at(8, 10, 0));
    }

    let window = attendance(&store, at(8, 11, 1))
        .window(COURSE)
        .await
        .expect("resolve window");
    let AttendanceWindow::Closed { next } = window else {
        panic!("window should be closed after the lesson");
    };
    assert_eq!(next.expect("another lesson follows").start, at(15, 10, 0));
}

#[test_log::test(tokio::test)]
async fn window_closed_after_series_has_no_next() {
    let store = seeded_store().await;

    let window = attendance(&store, at(20, 9, 0))
        .window(COURSE)
        .await
        .expect("resolve window");

    assert_eq!(window, AttendanceWindow::Closed { next: None });
}

/// ## Summary
/// Passes are redeemable strictly before their expiry.
#[test_log::test(tokio::test)]
async fn pass_expires_after_configured_minutes() {
    let (store, lesson_id) = seeded().await;
    let issued_at = at(8, 10, 5);

    let pass = attendance(&store, issued_at)
        .issue_pass(lesson_id)
        .expect("issue pass");

    assert_eq!(pass.lesson_id, lesson_id);
    assert_eq!(pass.expires_at, issued_at + TimeDelta::minutes(5));
    assert_eq!(pass.link_path(), format!("/attendance/{}", pass.link_id));

    let just_before = pass.expires_at - TimeDelta::seconds(1);
    assert_eq!(attendance(&store, just_before).redeem_pass(&pass), PassStatus::Valid);
    assert_eq!(
        attendance(&store, pass.expires_at).redeem_pass(&pass),
        PassStatus::Expired
    );
}

/// ## Summary
/// The request limit is enforced before the lesson window is consulted.
#[test_log::test(tokio::test)]
async fn photo_requests_are_limited_then_windowed() {
    let store = seeded_store().await;
    let during = attendance(&store, at(8, 10, 30));
    let outside = attendance(&store, at(9, 10, 30));

    let allowed = during
        .check_photo_request(COURSE, 2)
        .await
        .expect("check request");
    assert!(matches!(allowed, PhotoRequestDecision::Allowed(ref o) if o.start == at(8, 10, 0)));

    assert_eq!(
        during.check_photo_request(COURSE, 3).await.expect("check request"),
        PhotoRequestDecision::LimitExceeded { limit: 2 }
    );
    assert_eq!(
        outside.check_photo_request(COURSE, 3).await.expect("check request"),
        PhotoRequestDecision::LimitExceeded { limit: 2 }
    );
    assert_eq!(
        outside.check_photo_request(COURSE, 0).await.expect("check request"),
        PhotoRequestDecision::LessonInactive
    );
}

#[test_log::test]
fn roster_has_one_open_slot_per_occurrence() {
    let occurrences = rollcall_schedule::expand(&weekly_algebra(), &[]).expect("expand");

    let slots = roster_slots(&occurrences);

    assert_eq!(slots.len(), 3);
    assert_eq!(slots[1].date, date(2024, 1, 8));
    assert_eq!(slots[1].close, at(8, 11, 0));
    assert!(slots.iter().all(|slot| !slot.present));
}

#[test_log::test(tokio::test)]
async fn empty_course_window_is_closed() {
    let store = Arc::new(MemoryStore::new());
    let window = attendance(&store, at(1, 10, 0))
        .window(COURSE)
        .await
        .expect("resolve window");
    assert!(!window.is_open());

    scheduling(&store)
        .schedule(COURSE, &RecurrenceRule::once("Art", at(1, 9, 0), 60))
        .await
        .expect("schedule art");
    let window = attendance(&store, at(1, 10, 0))
        .window(COURSE)
        .await
        .expect("resolve window");
    assert!(window.is_open());
}
