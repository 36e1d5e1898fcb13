//! Collaborator-facing services around the scheduling engine.
//!
//! ## Module Organization
//!
//! - `store`: occurrence persistence contract and an in-memory implementation
//! - `scheduling`: create, edit and delete scheduled lessons
//! - `attendance`: attendance windows, QR passes and photo-request gating
//! - `calendar`: week views and the next upcoming lesson
//! - `clock`: wall-clock source, swappable in tests

pub mod attendance;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod scheduling;
pub mod store;
