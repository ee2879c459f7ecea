//! Round-event collection and scheduling.
//!
//! `collect` normalizes persisted challenge rows into [`RoundEvent`]s;
//! `schedule` orders them deterministically before simulation.
//!
//! [`RoundEvent`]: crate::models::event::RoundEvent

pub mod collect;
pub mod schedule;

pub use collect::collect_events;
pub use schedule::schedule_events;
