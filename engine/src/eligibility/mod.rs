//! Blue-point (priority challenge) eligibility.
//!
//! Runs only after a settlement has been accepted. Two independent rules
//! feed the final flag:
//!
//! - **Win streak**: a member who was challenged and defended every
//!   challenge in each of the most recent `blue_point_streak` consecutive
//!   periods earns blue point, except the position-1 holder, who never
//!   receives it.
//! - **Locked**: a non-top, non-suspended member who received no challenge
//!   at all this period and whom no active member could legally challenge
//!   under the final order. Locked members are force-granted blue point so
//!   nobody stays permanently unreachable.
//!
//! Streaks across periods are tracked as per-player counters: a period of
//! flawless defense increments the counter, any other period resets it to
//! zero. The caller persists the updated counters alongside the
//! eligibility flags.

use crate::models::entry::LadderEntry;
use crate::models::event::{Outcome, RoundEvent};
use crate::models::member::MemberRecord;
use crate::orchestrator::SettlementConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-member eligibility computed from one accepted settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BluePointEligibility {
    pub player_id: String,

    /// Priority-challenge status for the coming period
    pub is_blue_point: bool,

    /// Nobody could legally challenge this member under the final order
    pub is_locked: bool,
}

/// Result of an eligibility pass: the flags plus updated streak counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityOutcome {
    /// One entry per active non-suspended member, in final ladder order
    pub eligibility: Vec<BluePointEligibility>,

    /// Updated consecutive-defense-period counters for persistence
    pub streaks: HashMap<String, u32>,
}

/// Per-player defense activity observed in one period's events.
#[derive(Debug, Clone, Copy, Default)]
struct DefenseRecord {
    /// Decided challenges in which the player was the challenged side
    faced: u32,

    /// Of those, how many the player won
    won: u32,

    /// Any event naming the player as challenged, decided or not
    received_any: u32,
}

/// Evaluate blue-point eligibility against the settled order.
///
/// `events` is the period's full collected batch: rejected events still
/// count as "received a challenge" for the locked rule, while the streak
/// rule only looks at decided outcomes.
pub fn evaluate(
    final_order: &[LadderEntry],
    members: &[MemberRecord],
    events: &[RoundEvent],
    prior_streaks: &HashMap<String, u32>,
    access_threshold: Option<u32>,
    config: &SettlementConfig,
) -> EligibilityOutcome {
    let positions: HashMap<&str, u32> = final_order
        .iter()
        .map(|e| (e.player_id.as_str(), e.position))
        .collect();
    let defenses = defense_records(events);

    let active: Vec<&MemberRecord> = members.iter().filter(|m| !m.is_suspended).collect();
    let mut ordered = active.clone();
    ordered.sort_by(|a, b| {
        let pa = positions.get(a.player_id.as_str()).copied().unwrap_or(u32::MAX);
        let pb = positions.get(b.player_id.as_str()).copied().unwrap_or(u32::MAX);
        pa.cmp(&pb).then_with(|| a.player_id.cmp(&b.player_id))
    });

    let mut streaks = prior_streaks.clone();
    let mut eligibility = Vec::with_capacity(ordered.len());

    for member in ordered {
        let player_id = member.player_id.as_str();
        let defense = defenses.get(player_id).copied().unwrap_or_default();

        let streak = if defense.faced > 0 && defense.won == defense.faced {
            prior_streaks.get(player_id).copied().unwrap_or(0) + 1
        } else {
            0
        };
        streaks.insert(player_id.to_string(), streak);

        let position = positions.get(player_id).copied();
        let is_top = position == Some(1);
        let streak_grant = !is_top && position.is_some() && streak >= config.blue_point_streak;

        let is_locked = match position {
            Some(p) if p > 1 => {
                defense.received_any == 0
                    && !is_reachable(p, player_id, &active, &positions, access_threshold, config)
            }
            _ => false,
        };

        if is_locked {
            tracing::debug!(player_id, position = position.unwrap_or(0), "member locked; blue point force-granted");
        }

        eligibility.push(BluePointEligibility {
            player_id: player_id.to_string(),
            is_blue_point: streak_grant || is_locked,
            is_locked,
        });
    }

    EligibilityOutcome {
        eligibility,
        streaks,
    }
}

fn defense_records(events: &[RoundEvent]) -> HashMap<&str, DefenseRecord> {
    let mut records: HashMap<&str, DefenseRecord> = HashMap::new();

    for event in events {
        let Some(challenged) = event.challenged_id.as_deref() else {
            continue;
        };
        let record = records.entry(challenged).or_default();
        record.received_any += 1;

        if let Some(outcome) = event.outcome {
            if event.challenger_id.is_some() {
                record.faced += 1;
                if outcome == Outcome::ChallengerLoss {
                    record.won += 1;
                }
            }
        }
    }

    records
}

/// Whether any other active member could legally challenge position `p`
/// under the final order: a standard challenge from within
/// `max_positions_up` below, or an access challenge once `p` is at or past
/// the access threshold.
fn is_reachable(
    p: u32,
    player_id: &str,
    active: &[&MemberRecord],
    positions: &HashMap<&str, u32>,
    access_threshold: Option<u32>,
    config: &SettlementConfig,
) -> bool {
    let in_access_band = access_threshold.is_some_and(|threshold| p >= threshold);

    active.iter().any(|candidate| {
        if candidate.player_id == player_id {
            return false;
        }
        let Some(q) = positions.get(candidate.player_id.as_str()).copied() else {
            return false;
        };
        q > p && (q - p <= config.max_positions_up || in_access_band)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_order(ids: &[&str]) -> Vec<LadderEntry> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| LadderEntry::new(*id, (i + 1) as u32))
            .collect()
    }

    fn members(ids: &[&str]) -> Vec<MemberRecord> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| MemberRecord::new(*id, (i + 1) as u32))
            .collect()
    }

    fn entry<'a>(outcome: &'a EligibilityOutcome, player_id: &str) -> &'a BluePointEligibility {
        outcome
            .eligibility
            .iter()
            .find(|e| e.player_id == player_id)
            .unwrap()
    }

    #[test]
    fn test_successful_defense_grants_blue_point() {
        let order = final_order(&["a", "b", "c"]);
        let events = vec![RoundEvent::new("c", "b", Outcome::ChallengerLoss)];

        let outcome = evaluate(
            &order,
            &members(&["a", "b", "c"]),
            &events,
            &HashMap::new(),
            None,
            &SettlementConfig::default(),
        );

        assert!(entry(&outcome, "b").is_blue_point);
        assert_eq!(outcome.streaks.get("b"), Some(&1));
    }

    #[test]
    fn test_top_position_never_gets_streak_blue_point() {
        let order = final_order(&["a", "b", "c"]);
        let events = vec![RoundEvent::new("b", "a", Outcome::ChallengerLoss)];

        let outcome = evaluate(
            &order,
            &members(&["a", "b", "c"]),
            &events,
            &HashMap::new(),
            None,
            &SettlementConfig::default(),
        );

        assert!(!entry(&outcome, "a").is_blue_point);
        // The streak is still tracked; only the grant is withheld.
        assert_eq!(outcome.streaks.get("a"), Some(&1));
    }

    #[test]
    fn test_lost_defense_resets_streak() {
        let order = final_order(&["a", "b", "c"]);
        let events = vec![RoundEvent::new("c", "b", Outcome::ChallengerWin)];
        let prior: HashMap<String, u32> = [("b".to_string(), 3)].into();

        let outcome = evaluate(
            &order,
            &members(&["a", "b", "c"]),
            &events,
            &prior,
            None,
            &SettlementConfig::default(),
        );

        assert!(!entry(&outcome, "b").is_blue_point);
        assert_eq!(outcome.streaks.get("b"), Some(&0));
    }

    #[test]
    fn test_unchallenged_member_streak_resets() {
        let order = final_order(&["a", "b", "c"]);
        let prior: HashMap<String, u32> = [("b".to_string(), 2)].into();

        let outcome = evaluate(
            &order,
            &members(&["a", "b", "c"]),
            &[],
            &prior,
            None,
            &SettlementConfig::default(),
        );

        assert_eq!(outcome.streaks.get("b"), Some(&0));
    }

    #[test]
    fn test_multi_period_streak_requirement() {
        let order = final_order(&["a", "b", "c"]);
        let events = vec![RoundEvent::new("c", "b", Outcome::ChallengerLoss)];
        let config = SettlementConfig {
            blue_point_streak: 2,
            ..SettlementConfig::default()
        };

        // First flawless period: streak 1, not yet enough.
        let first = evaluate(
            &order,
            &members(&["a", "b", "c"]),
            &events,
            &HashMap::new(),
            None,
            &config,
        );
        assert!(!entry(&first, "b").is_blue_point);

        // Second flawless period: streak 2, granted.
        let second = evaluate(
            &order,
            &members(&["a", "b", "c"]),
            &events,
            &first.streaks,
            None,
            &config,
        );
        assert!(entry(&second, "b").is_blue_point);
    }

    #[test]
    fn test_unreachable_member_is_locked() {
        // b sits at position 2; the only player below within reach is
        // suspended, and the ladder is too short for anyone else.
        let order = final_order(&["a", "b", "c"]);
        let mut all = members(&["a", "b", "c"]);
        all[2].is_suspended = true;

        let outcome = evaluate(
            &order,
            &all,
            &[],
            &HashMap::new(),
            None,
            &SettlementConfig::default(),
        );

        let b = entry(&outcome, "b");
        assert!(b.is_locked);
        assert!(b.is_blue_point); // Force-granted despite no defenses
    }

    #[test]
    fn test_distant_member_is_locked_without_access_band() {
        // 15 players; position 2 is beyond max_positions_up of everyone
        // below once positions 3..=12 are suspended.
        let ids: Vec<String> = (1..=15).map(|i| format!("p{i:02}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let order = final_order(&id_refs);
        let mut all = members(&id_refs);
        for member in all.iter_mut().skip(2).take(10) {
            member.is_suspended = true;
        }

        let outcome = evaluate(
            &order,
            &all,
            &[],
            &HashMap::new(),
            None,
            &SettlementConfig::default(),
        );

        // Nearest active challenger sits at position 13; distance 11 > 10.
        assert!(entry(&outcome, "p02").is_locked);
    }

    #[test]
    fn test_access_band_member_is_reachable_not_locked() {
        let ids: Vec<String> = (1..=15).map(|i| format!("p{i:02}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let order = final_order(&id_refs);
        let mut all = members(&id_refs);
        for member in all.iter_mut().skip(2).take(10) {
            member.is_suspended = true;
        }

        // Same layout as above, but position 2 sits inside the access band,
        // so the bottom players can still reach it.
        let outcome = evaluate(
            &order,
            &all,
            &[],
            &HashMap::new(),
            Some(2),
            &SettlementConfig::default(),
        );

        assert!(!entry(&outcome, "p02").is_locked);
    }

    #[test]
    fn test_rejected_challenge_still_counts_as_received() {
        // b would be locked, but an (invalid, rejected) challenge against
        // them this period means they were not unchallenged.
        let order = final_order(&["a", "b", "c"]);
        let mut all = members(&["a", "b", "c"]);
        all[2].is_suspended = true;

        let mut event = RoundEvent::new("ghost", "b", Outcome::ChallengerWin);
        event.outcome = None; // Incomplete row, rejected by settlement

        let outcome = evaluate(
            &order,
            &all,
            &[event],
            &HashMap::new(),
            None,
            &SettlementConfig::default(),
        );

        assert!(!entry(&outcome, "b").is_locked);
    }

    #[test]
    fn test_suspended_members_excluded() {
        let order = final_order(&["a", "b"]);
        let mut all = members(&["a", "b"]);
        all[1].is_suspended = true;

        let outcome = evaluate(
            &order,
            &all,
            &[],
            &HashMap::new(),
            None,
            &SettlementConfig::default(),
        );

        assert!(outcome.eligibility.iter().all(|e| e.player_id != "b"));
    }
}
