//! Service-level tests against the in-memory store.

mod attendance;
mod calendar;
mod scheduling;
