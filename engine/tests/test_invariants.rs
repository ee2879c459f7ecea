//! Property Tests - Settlement Invariants
//!
//! Random baselines and event batches must always uphold the structural
//! guarantees: the player-id set is preserved, positions stay dense, and
//! identical inputs settle identically.

use ladder_settlement_core_rs::{
    schedule_events, settle_round, LadderEntry, Outcome, RoundEvent, SettlementConfig,
};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// Raw event descriptor: challenger index, challenged index, outcome code
type RawEvent = (usize, usize, u8);

fn outcome_from_code(code: u8) -> Outcome {
    match code % 3 {
        0 => Outcome::ChallengerWin,
        1 => Outcome::ChallengerLoss,
        _ => Outcome::DoubleWalkover,
    }
}

fn build_inputs(n: usize, raw: &[RawEvent]) -> (Vec<LadderEntry>, Vec<RoundEvent>) {
    let ids: Vec<String> = (0..n).map(|i| format!("p{i:02}")).collect();
    let baseline: Vec<LadderEntry> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| LadderEntry::new(id.clone(), (i + 1) as u32))
        .collect();

    let events: Vec<RoundEvent> = raw
        .iter()
        .enumerate()
        .filter(|(_, (challenger, challenged, _))| challenger % n != challenged % n)
        .map(|(index, (challenger, challenged, code))| {
            RoundEvent::new(
                ids[challenger % n].clone(),
                ids[challenged % n].clone(),
                outcome_from_code(*code),
            )
            .with_challenge_id(format!("c{index:03}"))
            .with_sequence_index(index)
        })
        .collect();

    (baseline, events)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn settlement_preserves_player_set_and_density(
        n in 2usize..12,
        raw in prop::collection::vec((0usize..12, 0usize..12, 0u8..3), 0..24),
    ) {
        let (baseline, events) = build_inputs(n, &raw);
        let scheduled = schedule_events(events, &baseline);

        let result = settle_round(&baseline, &scheduled, &SettlementConfig::default());

        let mut ids: Vec<&str> = result.final_order.iter().map(|e| e.player_id.as_str()).collect();
        ids.sort_unstable();
        let mut expected: Vec<&str> = baseline.iter().map(|e| e.player_id.as_str()).collect();
        expected.sort_unstable();
        prop_assert_eq!(ids, expected, "player-id set must match the baseline");

        let mut positions: Vec<u32> = result.final_order.iter().map(|e| e.position).collect();
        positions.sort_unstable();
        let dense: Vec<u32> = (1..=n as u32).collect();
        prop_assert_eq!(positions, dense, "positions must be dense 1..=N");
    }

    #[test]
    fn settlement_is_deterministic(
        n in 2usize..10,
        raw in prop::collection::vec((0usize..10, 0usize..10, 0u8..3), 0..16),
    ) {
        let (baseline, events) = build_inputs(n, &raw);

        let first = settle_round(
            &baseline,
            &schedule_events(events.clone(), &baseline),
            &SettlementConfig::default(),
        );
        let second = settle_round(
            &baseline,
            &schedule_events(events, &baseline),
            &SettlementConfig::default(),
        );

        prop_assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn empty_batches_never_move_anyone(n in 1usize..16) {
        let (baseline, _) = build_inputs(n, &[]);

        let result = settle_round(&baseline, &[], &SettlementConfig::default());

        prop_assert_eq!(result.final_order, baseline);
        prop_assert!(result.audit_log.is_empty());
        prop_assert!(result.violations.is_empty());
    }
}
