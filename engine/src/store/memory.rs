//! In-memory reference store.
//!
//! Backs the integration tests and lightweight embedders with plain
//! `HashMap`s. Period assignment of a challenge follows its scheduled
//! instant; a decided challenge belongs to the settlement batch of the
//! period it was scheduled in.

use crate::eligibility::BluePointEligibility;
use crate::models::challenge::ChallengeRecord;
use crate::models::entry::{LadderEntry, Period, PeriodWindow, SnapshotKind};
use crate::models::member::MemberRecord;
use crate::store::RankingStore;
use std::collections::{HashMap, HashSet};

/// All stored state for one ranking category.
#[derive(Debug, Clone, Default)]
struct RankingState {
    members: Vec<MemberRecord>,
    challenges: Vec<ChallengeRecord>,
    snapshots: HashMap<(Period, SnapshotKind), Vec<LadderEntry>>,
    audit_logs: HashMap<Period, Vec<String>>,
    access_threshold: Option<u32>,
    manual_overrides: HashSet<Period>,
    closed_periods: HashSet<Period>,
    defense_streaks: HashMap<String, u32>,
    eligibility: HashMap<String, BluePointEligibility>,
}

/// HashMap-backed [`RankingStore`] implementation.
///
/// # Example
/// ```
/// use ladder_settlement_core_rs::{MemberRecord, MemoryStore, RankingStore};
///
/// let mut store = MemoryStore::new();
/// store.add_member("club-a", MemberRecord::new("alice", 1));
/// store.add_member("club-a", MemberRecord::new("bob", 2));
///
/// assert_eq!(store.active_members("club-a").len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rankings: HashMap<String, RankingState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active member of a ranking category.
    pub fn add_member(&mut self, ranking_id: &str, member: MemberRecord) {
        self.ranking_mut(ranking_id).members.push(member);
    }

    /// Register a challenge record.
    pub fn add_challenge(&mut self, ranking_id: &str, challenge: ChallengeRecord) {
        self.ranking_mut(ranking_id).challenges.push(challenge);
    }

    /// Remove a challenge record (operator cancels an offending challenge).
    pub fn remove_challenge(&mut self, ranking_id: &str, challenge_id: &str) {
        self.ranking_mut(ranking_id)
            .challenges
            .retain(|c| c.id != challenge_id);
    }

    /// Configure the access-challenge threshold for a ranking category.
    pub fn set_access_threshold(&mut self, ranking_id: &str, threshold: Option<u32>) {
        self.ranking_mut(ranking_id).access_threshold = threshold;
    }

    /// Set the manual order override marker for a period.
    pub fn set_manual_override(&mut self, ranking_id: &str, period: Period) {
        self.ranking_mut(ranking_id).manual_overrides.insert(period);
    }

    /// Seed a defense-streak counter.
    pub fn set_defense_streak(&mut self, ranking_id: &str, player_id: &str, streak: u32) {
        self.ranking_mut(ranking_id)
            .defense_streaks
            .insert(player_id.to_string(), streak);
    }

    /// The audit log persisted for a period, if any.
    pub fn audit_log(&self, ranking_id: &str, period: Period) -> Option<&[String]> {
        self.rankings
            .get(ranking_id)
            .and_then(|r| r.audit_logs.get(&period))
            .map(|lines| lines.as_slice())
    }

    /// Persisted eligibility for a player, if any.
    pub fn eligibility(&self, ranking_id: &str, player_id: &str) -> Option<&BluePointEligibility> {
        self.rankings
            .get(ranking_id)
            .and_then(|r| r.eligibility.get(player_id))
    }

    fn ranking(&self, ranking_id: &str) -> Option<&RankingState> {
        self.rankings.get(ranking_id)
    }

    fn ranking_mut(&mut self, ranking_id: &str) -> &mut RankingState {
        self.rankings.entry(ranking_id.to_string()).or_default()
    }
}

impl RankingStore for MemoryStore {
    fn baseline_snapshot(
        &self,
        ranking_id: &str,
        period: Period,
        kind: SnapshotKind,
    ) -> Option<Vec<LadderEntry>> {
        self.ranking(ranking_id)
            .and_then(|r| r.snapshots.get(&(period, kind)))
            .cloned()
    }

    fn completed_challenges(&self, ranking_id: &str, window: PeriodWindow) -> Vec<ChallengeRecord> {
        self.scheduled_challenges(ranking_id, window)
            .into_iter()
            .filter(|c| c.is_decided())
            .collect()
    }

    fn scheduled_challenges(&self, ranking_id: &str, window: PeriodWindow) -> Vec<ChallengeRecord> {
        self.ranking(ranking_id)
            .map(|r| {
                r.challenges
                    .iter()
                    .filter(|c| window.contains(c.scheduled_at))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn active_members(&self, ranking_id: &str) -> Vec<MemberRecord> {
        self.ranking(ranking_id)
            .map(|r| r.members.clone())
            .unwrap_or_default()
    }

    fn access_threshold(&self, ranking_id: &str) -> Option<u32> {
        self.ranking(ranking_id).and_then(|r| r.access_threshold)
    }

    fn manual_override(&self, ranking_id: &str, period: Period) -> bool {
        self.ranking(ranking_id)
            .map(|r| r.manual_overrides.contains(&period))
            .unwrap_or(false)
    }

    fn is_period_closed(&self, ranking_id: &str, period: Period) -> bool {
        self.ranking(ranking_id)
            .map(|r| r.closed_periods.contains(&period))
            .unwrap_or(false)
    }

    fn defense_streaks(&self, ranking_id: &str) -> HashMap<String, u32> {
        self.ranking(ranking_id)
            .map(|r| r.defense_streaks.clone())
            .unwrap_or_default()
    }

    fn persist_baseline_snapshot(
        &mut self,
        ranking_id: &str,
        period: Period,
        kind: SnapshotKind,
        entries: &[LadderEntry],
    ) {
        self.ranking_mut(ranking_id)
            .snapshots
            .insert((period, kind), entries.to_vec());
    }

    fn persist_final_positions(&mut self, ranking_id: &str, entries: &[LadderEntry]) {
        let ranking = self.ranking_mut(ranking_id);
        let positions: HashMap<&str, u32> = entries
            .iter()
            .map(|e| (e.player_id.as_str(), e.position))
            .collect();

        for member in &mut ranking.members {
            if let Some(position) = positions.get(member.player_id.as_str()) {
                member.live_position = *position;
            }
        }
    }

    fn persist_audit_log(&mut self, ranking_id: &str, period: Period, lines: &[String]) {
        // Replace semantics: a re-close overwrites the prior log wholesale.
        self.ranking_mut(ranking_id)
            .audit_logs
            .insert(period, lines.to_vec());
    }

    fn persist_defense_streaks(&mut self, ranking_id: &str, streaks: &HashMap<String, u32>) {
        self.ranking_mut(ranking_id).defense_streaks = streaks.clone();
    }

    fn persist_eligibility(&mut self, ranking_id: &str, eligibility: &[BluePointEligibility]) {
        let ranking = self.ranking_mut(ranking_id);
        for entry in eligibility {
            ranking
                .eligibility
                .insert(entry.player_id.clone(), entry.clone());

            if let Some(member) = ranking
                .members
                .iter_mut()
                .find(|m| m.player_id == entry.player_id)
            {
                member.is_blue_point = entry.is_blue_point;
            }
        }
    }

    fn mark_period_closed(&mut self, ranking_id: &str, period: Period) {
        self.ranking_mut(ranking_id).closed_periods.insert(period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_snapshot_roundtrip() {
        let mut store = MemoryStore::new();
        let period = Period::new(2026, 3);
        let entries = vec![LadderEntry::new("alice", 1), LadderEntry::new("bob", 2)];

        store.persist_baseline_snapshot("club-a", period, SnapshotKind::Start, &entries);

        assert_eq!(
            store.baseline_snapshot("club-a", period, SnapshotKind::Start),
            Some(entries)
        );
        assert_eq!(
            store.baseline_snapshot("club-a", period, SnapshotKind::End),
            None
        );
    }

    #[test]
    fn test_completed_filters_undecided_and_out_of_window() {
        let mut store = MemoryStore::new();
        let period = Period::new(2026, 3);
        let in_window = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
        let out_of_window = Utc.with_ymd_and_hms(2026, 2, 10, 18, 0, 0).unwrap();

        store.add_challenge(
            "club-a",
            ChallengeRecord::new("dave", "bob", in_window).with_winner("dave"),
        );
        store.add_challenge("club-a", ChallengeRecord::new("carol", "bob", in_window));
        store.add_challenge(
            "club-a",
            ChallengeRecord::new("erin", "bob", out_of_window).with_winner("erin"),
        );

        let completed = store.completed_challenges("club-a", period.window());
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].challenger_id, "dave");

        let scheduled = store.scheduled_challenges("club-a", period.window());
        assert_eq!(scheduled.len(), 2);
    }

    #[test]
    fn test_audit_log_replaced_not_appended() {
        let mut store = MemoryStore::new();
        let period = Period::new(2026, 3);

        store.persist_audit_log("club-a", period, &["first".to_string()]);
        store.persist_audit_log("club-a", period, &["second".to_string()]);

        assert_eq!(store.audit_log("club-a", period), Some(&["second".to_string()][..]));
    }

    #[test]
    fn test_final_positions_update_members() {
        let mut store = MemoryStore::new();
        store.add_member("club-a", MemberRecord::new("alice", 1));
        store.add_member("club-a", MemberRecord::new("bob", 2));

        store.persist_final_positions(
            "club-a",
            &[LadderEntry::new("bob", 1), LadderEntry::new("alice", 2)],
        );

        let members = store.active_members("club-a");
        let bob = members.iter().find(|m| m.player_id == "bob").unwrap();
        assert_eq!(bob.live_position, 1);
    }
}
