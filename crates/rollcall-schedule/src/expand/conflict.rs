use crate::occurrence::{Occurrence, OccurrenceId};

/// ## Summary
/// Identities of every occurrence in `others` that overlaps `candidate`.
///
/// Occurrences carrying the candidate's own identity are skipped, so an edited
/// lesson never conflicts with its previous version.
#[must_use]
pub fn find_conflicts<'a, I>(candidate: &Occurrence, others: I) -> Vec<OccurrenceId>
where
    I: IntoIterator<Item = &'a Occurrence>,
{
    others
        .into_iter()
        .filter(|other| other.id != candidate.id && candidate.overlaps(other))
        .map(|other| other.id)
        .collect()
}
