//! Ladder rule validation.
//!
//! Checks one round event against the ladder before it may touch any
//! positions. Rejections come back as [`Violation`]s, never as errors: the
//! settlement loop records them and moves on to the next event.
//!
//! # Position resolution
//!
//! Challenge rows carry the positions both players held when the challenge
//! was created. Those snapshots are preferred when they are coherent
//! (challenger strictly below the challenged); otherwise the ladder's
//! current positions are consulted. When neither source yields a coherent
//! ordering, the event is irreconcilable and rejected as
//! `InvalidChallengeOrder` rather than guessing which source to trust.

use crate::ladder::LadderSimulator;
use crate::models::event::{Outcome, RoundEvent};
use crate::models::report::Violation;
use crate::orchestrator::SettlementConfig;

/// A fully validated event with resolved positions, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEvent {
    pub challenger_id: String,
    pub challenged_id: String,
    pub outcome: Outcome,
    pub is_access_challenge: bool,

    /// Resolved position of the challenger (numerically worse side)
    pub challenger_position: u32,

    /// Resolved position of the challenged (numerically better side)
    pub challenged_position: u32,

    /// Position gap `challenger_position - challenged_position`, always ≥ 1
    pub distance: u32,
}

/// Validate an event against the ladder and the configured rules.
///
/// Expects a complete event (the loop rejects incomplete rows before
/// calling in here). Admin-created events skip the distance and threshold
/// checks but still go through existence, resolution, and ordering.
pub fn validate_event(
    event: &RoundEvent,
    challenger_id: &str,
    challenged_id: &str,
    outcome: Outcome,
    ladder: &LadderSimulator,
    config: &SettlementConfig,
) -> Result<ValidEvent, Violation> {
    for player_id in [challenger_id, challenged_id] {
        if !ladder.contains(player_id) {
            return Err(Violation::PlayerNotInBaseline {
                challenge_ref: event.reference(),
                player_id: player_id.to_string(),
            });
        }
    }

    let (challenger_position, challenged_position) =
        resolve_positions(event, challenger_id, challenged_id, ladder)?;
    let distance = challenger_position - challenged_position;

    if !event.bypass_rules {
        if event.is_access_challenge {
            if let Some(threshold) = event.access_threshold {
                if challenged_position < threshold {
                    return Err(Violation::AccessThresholdViolation {
                        challenge_ref: event.reference(),
                        challenged_position,
                        threshold,
                    });
                }
            }
        } else if distance > config.max_positions_up {
            return Err(Violation::DistanceLimitExceeded {
                challenge_ref: event.reference(),
                distance,
                limit: config.max_positions_up,
            });
        }
    }

    Ok(ValidEvent {
        challenger_id: challenger_id.to_string(),
        challenged_id: challenged_id.to_string(),
        outcome,
        is_access_challenge: event.is_access_challenge,
        challenger_position,
        challenged_position,
        distance,
    })
}

/// Prefer the event's own snapshot positions when they already place the
/// challenger strictly below the challenged; otherwise fall back to the
/// ladder's current positions under the same requirement.
fn resolve_positions(
    event: &RoundEvent,
    challenger_id: &str,
    challenged_id: &str,
    ladder: &LadderSimulator,
) -> Result<(u32, u32), Violation> {
    if let (Some(challenger), Some(challenged)) = (
        event.challenger_snapshot_position,
        event.challenged_snapshot_position,
    ) {
        if challenger > challenged {
            return Ok((challenger, challenged));
        }
    }

    // Existence was checked above; the ladder resolves both players.
    let challenger = ladder
        .position_of(challenger_id)
        .expect("challenger exists on the ladder");
    let challenged = ladder
        .position_of(challenged_id)
        .expect("challenged exists on the ladder");

    if challenger > challenged {
        Ok((challenger, challenged))
    } else {
        Err(Violation::InvalidChallengeOrder {
            challenge_ref: event.reference(),
            challenger_id: challenger_id.to_string(),
            challenged_id: challenged_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder(ids: &[&str]) -> LadderSimulator {
        LadderSimulator::from_order(ids.iter().map(|s| s.to_string()).collect())
    }

    fn validate(event: &RoundEvent, ladder: &LadderSimulator) -> Result<ValidEvent, Violation> {
        validate_event(
            event,
            event.challenger_id.as_deref().unwrap(),
            event.challenged_id.as_deref().unwrap(),
            event.outcome.unwrap(),
            ladder,
            &SettlementConfig::default(),
        )
    }

    #[test]
    fn test_valid_event_resolves_from_ladder() {
        let l = ladder(&["a", "b", "c", "d"]);
        let event = RoundEvent::new("d", "b", Outcome::ChallengerWin);

        let valid = validate(&event, &l).unwrap();

        assert_eq!(valid.challenger_position, 4);
        assert_eq!(valid.challenged_position, 2);
        assert_eq!(valid.distance, 2);
    }

    #[test]
    fn test_snapshot_positions_preferred_when_coherent() {
        let l = ladder(&["a", "b", "c", "d"]);
        let event = RoundEvent::new("d", "b", Outcome::ChallengerWin)
            .with_snapshot_positions(Some(5), Some(3));

        let valid = validate(&event, &l).unwrap();

        assert_eq!(valid.challenger_position, 5);
        assert_eq!(valid.challenged_position, 3);
    }

    #[test]
    fn test_incoherent_snapshots_fall_back_to_ladder() {
        let l = ladder(&["a", "b", "c", "d"]);
        // Snapshots claim the challenger was above the challenged; ladder
        // order still validates the event.
        let event = RoundEvent::new("d", "b", Outcome::ChallengerWin)
            .with_snapshot_positions(Some(2), Some(4));

        let valid = validate(&event, &l).unwrap();

        assert_eq!(valid.challenger_position, 4);
        assert_eq!(valid.challenged_position, 2);
    }

    #[test]
    fn test_challenger_above_challenged_is_invalid() {
        let l = ladder(&["a", "b"]);
        let event = RoundEvent::new("a", "b", Outcome::ChallengerWin);

        let violation = validate(&event, &l).unwrap_err();

        assert!(matches!(violation, Violation::InvalidChallengeOrder { .. }));
    }

    #[test]
    fn test_unknown_player_rejected() {
        let l = ladder(&["a", "b"]);
        let event = RoundEvent::new("ghost", "a", Outcome::ChallengerWin);

        let violation = validate(&event, &l).unwrap_err();

        assert_eq!(
            violation,
            Violation::PlayerNotInBaseline {
                challenge_ref: "ghost vs a".to_string(),
                player_id: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_distance_limit() {
        let ids: Vec<String> = (1..=12).map(|i| format!("p{i:02}")).collect();
        let l = LadderSimulator::from_order(ids);
        let event = RoundEvent::new("p12", "p01", Outcome::ChallengerWin);

        let violation = validate(&event, &l).unwrap_err();

        assert_eq!(
            violation,
            Violation::DistanceLimitExceeded {
                challenge_ref: "p12 vs p01".to_string(),
                distance: 11,
                limit: 10,
            }
        );
    }

    #[test]
    fn test_bypass_rules_skips_distance_check() {
        let ids: Vec<String> = (1..=12).map(|i| format!("p{i:02}")).collect();
        let l = LadderSimulator::from_order(ids);
        let event = RoundEvent::new("p12", "p01", Outcome::ChallengerWin).bypassing_rules();

        assert!(validate(&event, &l).is_ok());
    }

    #[test]
    fn test_access_threshold_violation() {
        let l = ladder(&["a", "b", "c", "d"]);
        let event = RoundEvent::new("d", "b", Outcome::ChallengerWin).access(Some(3));

        let violation = validate(&event, &l).unwrap_err();

        assert_eq!(
            violation,
            Violation::AccessThresholdViolation {
                challenge_ref: "d vs b".to_string(),
                challenged_position: 2,
                threshold: 3,
            }
        );
    }

    #[test]
    fn test_access_challenge_at_threshold_allowed() {
        let l = ladder(&["a", "b", "c", "d"]);
        let event = RoundEvent::new("d", "c", Outcome::ChallengerWin).access(Some(3));

        assert!(validate(&event, &l).is_ok());
    }

    #[test]
    fn test_access_challenge_without_threshold_allowed() {
        let l = ladder(&["a", "b", "c", "d"]);
        let event = RoundEvent::new("d", "a", Outcome::ChallengerWin).access(None);

        // No configured threshold and no distance limit for access challenges.
        assert!(validate(&event, &l).is_ok());
    }
}
