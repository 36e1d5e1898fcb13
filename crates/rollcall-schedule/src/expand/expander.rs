use rollcall_core::constants::DEFAULT_MAX_OCCURRENCES;

use super::conflict::find_conflicts;
use crate::error::ConflictError;
use crate::occurrence::{Occurrence, OccurrenceId};
use crate::rule::{RecurrenceRule, ScheduleLimits};

/// ## Summary
/// Expands `rule` with default settings, checking it against `existing`.
///
/// ## Errors
/// Returns `ConflictError` if any generated occurrence overlaps an existing one.
pub fn expand(
    rule: &RecurrenceRule,
    existing: &[Occurrence],
) -> Result<Vec<Occurrence>, ConflictError> {
    RecurrenceExpander::new(rule).expand(existing)
}

/// ## Summary
/// Expands a recurrence rule into individual occurrences.
///
/// The anchor occurrence is always produced. Repeats are generated by stepping a
/// cursor from the anchor while it is before the end date, and a step that lands
/// after the end date ends the series, so a repeat starting exactly on the end
/// date is kept.
#[derive(Debug, Clone)]
pub struct RecurrenceExpander<'a> {
    rule: &'a RecurrenceRule,
    first_id: Option<OccurrenceId>,
    max_occurrences: usize,
    check_self_overlap: bool,
}

impl<'a> RecurrenceExpander<'a> {
    /// Creates a new expander for `rule`.
    #[must_use]
    pub const fn new(rule: &'a RecurrenceRule) -> Self {
        Self {
            rule,
            first_id: None,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            check_self_overlap: false,
        }
    }

    /// Reuses `id` for the anchor occurrence, as when a lesson is edited.
    #[must_use]
    pub const fn with_first_id(mut self, id: OccurrenceId) -> Self {
        self.first_id = Some(id);
        self
    }

    /// Sets the maximum number of occurrences.
    #[must_use]
    pub const fn with_max_occurrences(mut self, max: usize) -> Self {
        self.max_occurrences = max;
        self
    }

    /// Also rejects a series whose own occurrences overlap each other.
    #[must_use]
    pub const fn with_self_overlap_check(mut self, enabled: bool) -> Self {
        self.check_self_overlap = enabled;
        self
    }

    /// Applies the expansion-related parts of `limits`.
    #[must_use]
    pub const fn with_limits(self, limits: &ScheduleLimits) -> Self {
        self.with_max_occurrences(limits.max_occurrences)
            .with_self_overlap_check(limits.reject_self_overlap)
    }

    /// ## Summary
    /// Expands the rule, checking every generated occurrence against `existing`.
    ///
    /// `existing` is only read. On conflict nothing is returned.
    ///
    /// ## Errors
    /// Returns `ConflictError` naming every existing occurrence the first
    /// conflicting candidate overlaps.
    #[tracing::instrument(skip(self, existing), fields(
        title = %self.rule.title,
        anchor_start = %self.rule.anchor_start,
        is_repeating = self.rule.is_repeating,
        existing = existing.len(),
    ))]
    pub fn expand(&self, existing: &[Occurrence]) -> Result<Vec<Occurrence>, ConflictError> {
        let rule = self.rule;
        let first_id = self.first_id.unwrap_or_else(OccurrenceId::generate);
        let Some(mut first) = Occurrence::from_rule(first_id, rule, rule.anchor_start) else {
            tracing::warn!("Lesson end is out of calendar range, nothing to schedule");
            return Ok(Vec::new());
        };
        first.repetition = rule.repetition();

        self.check(&first, existing, &[])?;
        let mut occurrences = vec![first];

        let (true, Some(end_date)) = (rule.is_repeating, rule.end_date) else {
            tracing::trace!("Single occurrence");
            return Ok(occurrences);
        };
        let Some(step) = rule.frequency.step(rule.interval) else {
            tracing::warn!(interval = rule.interval.get(), "Repetition step out of range");
            return Ok(occurrences);
        };

        let mut cursor = rule.anchor_start;
        while cursor < end_date {
            if occurrences.len() >= self.max_occurrences {
                tracing::warn!(
                    max_occurrences = self.max_occurrences,
                    "Occurrence limit reached, truncating series"
                );
                break;
            }
            let Some(next) = cursor.checked_add_signed(step) else {
                break;
            };
            cursor = next;
            if cursor > end_date {
                break;
            }
            let Some(occurrence) = Occurrence::from_rule(OccurrenceId::generate(), rule, cursor)
            else {
                break;
            };

            let accumulated: &[Occurrence] = if self.check_self_overlap {
                occurrences.as_slice()
            } else {
                &[]
            };
            self.check(&occurrence, existing, accumulated)?;
            occurrences.push(occurrence);
        }

        tracing::debug!(count = occurrences.len(), "Expanded lesson series");
        Ok(occurrences)
    }

    fn check(
        &self,
        candidate: &Occurrence,
        existing: &[Occurrence],
        accumulated: &[Occurrence],
    ) -> Result<(), ConflictError> {
        let conflicting = find_conflicts(candidate, existing.iter().chain(accumulated));
        if conflicting.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            start = %candidate.start,
            conflicts = conflicting.len(),
            "Lesson overlaps scheduled occurrences"
        );
        Err(ConflictError {
            title: self.rule.title.clone(),
            start: candidate.start,
            end: candidate.end,
            conflicting,
        })
    }
}
