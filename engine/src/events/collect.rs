//! Challenge-record normalization.
//!
//! Maps the period's decided challenge rows into [`RoundEvent`]s for the
//! settlement loop. Blank participant ids and undecidable winners survive
//! as `None` fields so the loop can reject them as `IncompleteEvent`
//! violations instead of this pass dropping them silently.

use crate::models::challenge::ChallengeRecord;
use crate::models::event::{Outcome, RoundEvent};

/// Normalize decided challenge records into round events.
///
/// `access_threshold` is the ranking category's configured access band,
/// stamped onto every event so the settlement loop stays free of store
/// lookups. Sequence indices follow the record order, which is the
/// submission order of the underlying rows.
pub fn collect_events(
    records: &[ChallengeRecord],
    access_threshold: Option<u32>,
) -> Vec<RoundEvent> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| to_event(record, access_threshold, index))
        .collect()
}

fn to_event(record: &ChallengeRecord, access_threshold: Option<u32>, index: usize) -> RoundEvent {
    let challenger_id = non_blank(&record.challenger_id);
    let challenged_id = non_blank(&record.challenged_id);

    RoundEvent {
        challenge_id: Some(record.id.clone()),
        challenger_id: challenger_id.clone(),
        challenged_id: challenged_id.clone(),
        outcome: outcome_of(record, challenger_id.as_deref(), challenged_id.as_deref()),
        is_access_challenge: record.is_access_challenge,
        access_threshold,
        bypass_rules: record.created_by_admin,
        challenger_snapshot_position: record.challenger_position_hint,
        challenged_snapshot_position: record.challenged_position_hint,
        played_at: record.played_at,
        sequence_index: index,
    }
}

/// Combine winner and walkover flags into the closed outcome union.
///
/// Both sides absent is a double walkover regardless of any recorded
/// winner; otherwise the winner decides. A winner matching neither
/// participant is treated as undecided (storage corruption surfaces as an
/// `IncompleteEvent` violation downstream).
fn outcome_of(
    record: &ChallengeRecord,
    challenger_id: Option<&str>,
    challenged_id: Option<&str>,
) -> Option<Outcome> {
    if record.challenger_walkover && record.challenged_walkover {
        return Some(Outcome::DoubleWalkover);
    }

    match record.winner_id.as_deref() {
        Some(winner) if Some(winner) == challenger_id => Some(Outcome::ChallengerWin),
        Some(winner) if Some(winner) == challenged_id => Some(Outcome::ChallengerLoss),
        _ => None,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
