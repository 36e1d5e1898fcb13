use chrono::{Datelike, NaiveDate};

use crate::rule::{Frequency, RecurrenceRule};

/// ## Summary
/// Whether `candidate` is a day the rule's pattern lands on.
///
/// Used by the lightweight calendar preview, which works from the rule rather
/// than expanded occurrences. Monthly here means "same day of the month", unlike
/// expansion, which steps 30 days.
///
/// Non-repeating rules match only their anchor date. Repeating rules never match
/// before the anchor date or after the end date's day.
#[must_use]
pub fn is_within_repeating_pattern(rule: &RecurrenceRule, candidate: NaiveDate) -> bool {
    let anchor = rule.anchor_start.date();
    if !rule.is_repeating {
        return candidate == anchor;
    }
    if rule
        .end_date
        .is_some_and(|end_date| candidate > end_date.date())
    {
        return false;
    }
    if candidate < anchor {
        return false;
    }

    let interval = i64::from(rule.interval.get());
    let days = candidate.signed_duration_since(anchor).num_days();
    match rule.frequency {
        Frequency::Daily => days % interval == 0,
        Frequency::Weekly => {
            candidate.weekday() == anchor.weekday() && (days / 7) % interval == 0
        }
        Frequency::Monthly => {
            candidate.day() == anchor.day() && months_between(anchor, candidate) % interval == 0
        }
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}
