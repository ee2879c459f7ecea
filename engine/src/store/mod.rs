//! Persistence port for the settlement engine.
//!
//! The engine never talks to a database directly: everything it reads or
//! writes goes through the [`RankingStore`] trait, which the host
//! application implements over its own storage. The engine assumes the
//! store serializes concurrent closes for the same (ranking, period) and
//! commits the write operations of one close atomically; the engine itself
//! performs no locking.
//!
//! [`MemoryStore`](memory::MemoryStore) is the reference implementation
//! used by tests and lightweight embedders.

pub mod memory;

pub use memory::MemoryStore;

use crate::eligibility::BluePointEligibility;
use crate::models::challenge::ChallengeRecord;
use crate::models::entry::{LadderEntry, Period, PeriodWindow, SnapshotKind};
use crate::models::member::MemberRecord;
use std::collections::HashMap;

/// Storage operations the settlement engine consumes and exposes.
pub trait RankingStore {
    /// Persisted ladder order snapshot for a period, if one exists.
    fn baseline_snapshot(
        &self,
        ranking_id: &str,
        period: Period,
        kind: SnapshotKind,
    ) -> Option<Vec<LadderEntry>>;

    /// Decided challenges belonging to the period window.
    fn completed_challenges(&self, ranking_id: &str, window: PeriodWindow) -> Vec<ChallengeRecord>;

    /// All challenges scheduled within the period window, decided or not.
    ///
    /// The baseline resolver mines these for position-at-challenge hints.
    fn scheduled_challenges(&self, ranking_id: &str, window: PeriodWindow) -> Vec<ChallengeRecord>;

    /// Active membership of the ranking category, suspended members included.
    fn active_members(&self, ranking_id: &str) -> Vec<MemberRecord>;

    /// Minimum challenged position for access challenges, if configured.
    fn access_threshold(&self, ranking_id: &str) -> Option<u32>;

    /// Period-level manual order override marker.
    fn manual_override(&self, ranking_id: &str, period: Period) -> bool;

    /// Whether the period has already been closed.
    fn is_period_closed(&self, ranking_id: &str, period: Period) -> bool;

    /// Per-player consecutive-defense-period counters.
    fn defense_streaks(&self, ranking_id: &str) -> HashMap<String, u32>;

    /// Persist a ladder order snapshot, replacing any prior snapshot of the
    /// same kind for the period.
    fn persist_baseline_snapshot(
        &mut self,
        ranking_id: &str,
        period: Period,
        kind: SnapshotKind,
        entries: &[LadderEntry],
    );

    /// Persist the settled positions as the new live membership order.
    fn persist_final_positions(&mut self, ranking_id: &str, entries: &[LadderEntry]);

    /// Persist the period audit log. Replaces, never appends, any prior log
    /// for the same period.
    fn persist_audit_log(&mut self, ranking_id: &str, period: Period, lines: &[String]);

    /// Persist updated defense-streak counters.
    fn persist_defense_streaks(&mut self, ranking_id: &str, streaks: &HashMap<String, u32>);

    /// Persist per-member blue-point eligibility.
    fn persist_eligibility(&mut self, ranking_id: &str, eligibility: &[BluePointEligibility]);

    /// Flag the period as closed.
    fn mark_period_closed(&mut self, ranking_id: &str, period: Period);
}
