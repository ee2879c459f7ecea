//! The settlement loop.
//!
//! Pure function of `(baseline, events, config)`: walks the scheduled
//! events in order, validates each against the evolving ladder, applies the
//! valid ones to the simulator, and aggregates the final order, the audit
//! trail, and every violation found. No I/O, no hidden state, no clock.
//!
//! # Critical Invariants
//!
//! 1. **Set preservation**: the final order holds exactly the baseline's
//!    player ids, renumbered densely `1..=N`
//! 2. **Violations are data**: a rejected event is recorded and skipped;
//!    the rest of the batch still settles
//! 3. **Determinism**: identical inputs produce an identical result,
//!    byte for byte

use crate::ladder::LadderSimulator;
use crate::models::entry::LadderEntry;
use crate::models::event::{Outcome, RoundEvent};
use crate::models::report::{push_violation, SettlementResult, Violation};
use crate::orchestrator::SettlementConfig;
use crate::settlement::rules::{validate_event, ValidEvent};
use std::collections::HashSet;

/// Settle one period's events over a baseline order.
///
/// Events are expected in scheduled order (see
/// [`schedule_events`](crate::events::schedule_events)); this function does
/// not reorder them.
///
/// # Panics
/// Panics if the baseline contains a duplicate player id.
pub fn settle_round(
    baseline: &[LadderEntry],
    events: &[RoundEvent],
    config: &SettlementConfig,
) -> SettlementResult {
    let mut ladder = LadderSimulator::from_baseline(baseline);
    let mut audit_log = Vec::new();
    let mut violations = Vec::new();
    let mut processed: HashSet<String> = HashSet::new();

    tracing::debug!(players = ladder.len(), events = events.len(), "settling round");

    for event in events {
        let (challenger_id, challenged_id, outcome) = match complete_parts(event) {
            Some(parts) => parts,
            None => {
                push_violation(
                    &mut violations,
                    Violation::IncompleteEvent {
                        challenge_ref: event.reference(),
                    },
                );
                continue;
            }
        };

        // Repeated challenge ids are processed once; not a violation.
        if let Some(id) = &event.challenge_id {
            if !processed.insert(id.clone()) {
                continue;
            }
        }

        match validate_event(event, &challenger_id, &challenged_id, outcome, &ladder, config) {
            Ok(valid) => apply_event(&mut ladder, &valid, &mut audit_log),
            Err(violation) => push_violation(&mut violations, violation),
        }
    }

    tracing::debug!(
        applied = audit_log.len(),
        violations = violations.len(),
        "round settled"
    );

    SettlementResult {
        final_order: ladder.final_order(),
        audit_log,
        violations,
    }
}

fn complete_parts(event: &RoundEvent) -> Option<(String, String, Outcome)> {
    Some((
        event.challenger_id.clone()?,
        event.challenged_id.clone()?,
        event.outcome?,
    ))
}

/// Apply one validated event to the ladder and append its audit line.
fn apply_event(ladder: &mut LadderSimulator, valid: &ValidEvent, audit_log: &mut Vec<String>) {
    let challenger = valid.challenger_id.as_str();
    let challenged = valid.challenged_id.as_str();

    match valid.outcome {
        Outcome::ChallengerWin => {
            let position = ladder.apply_victory(challenger, valid.challenged_position);
            audit_log.push(format!(
                "{challenger} won against {challenged}; assumed position {position}."
            ));
        }
        Outcome::ChallengerLoss if valid.is_access_challenge => {
            let last = ladder.len() as u32;
            ladder.apply_penalty(challenger, last);
            audit_log.push(format!(
                "Access challenge: {challenger} lost to {challenged} and moved to last position."
            ));
        }
        Outcome::ChallengerLoss => {
            let position = ladder.apply_defeat(challenger, valid.distance.max(1));
            ladder.mark_defense_win(challenged);
            audit_log.push(format!(
                "{challenger} lost to {challenged}; dropped to position {position}."
            ));
        }
        Outcome::DoubleWalkover => {
            // Challenger first: it sits below the challenged, so its drop
            // cannot disturb the challenged's slot and both finish exactly
            // one position lower.
            ladder.apply_penalty(challenger, 1);
            ladder.apply_penalty(challenged, 1);
            audit_log.push(format!(
                "{challenger} and {challenged} had a double walkover; both dropped one position."
            ));
        }
    }
}
