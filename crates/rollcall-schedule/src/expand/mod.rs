//! Rule expansion.
//!
//! Turns one [`RecurrenceRule`](crate::rule::RecurrenceRule) into the ordered list of
//! occurrences it denotes, refusing the whole series if any of it lands on top of
//! an occurrence that is already scheduled.

mod conflict;
mod expander;


pub use conflict::find_conflicts;
pub use expander::{RecurrenceExpander, expand};
