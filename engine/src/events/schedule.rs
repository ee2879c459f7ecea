//! Deterministic event ordering.
//!
//! Events are settled in ladder order, not storage order: matches nearer
//! the top of the baseline settle first, so position cascades reproduce
//! identically no matter how the rows came back from storage. Ties fall
//! back to played-at time, then to original submission order.

use crate::models::entry::LadderEntry;
use crate::models::event::RoundEvent;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sort events into settlement order.
///
/// Ascending by the minimum of the two participants' baseline positions;
/// events where neither participant resolves against the baseline sort
/// last. Ties break by `played_at` ascending (missing timestamps last),
/// then by submission order. The sort is stable, so fully tied events keep
/// their relative order.
pub fn schedule_events(mut events: Vec<RoundEvent>, baseline: &[LadderEntry]) -> Vec<RoundEvent> {
    let positions: HashMap<&str, u32> = baseline
        .iter()
        .map(|entry| (entry.player_id.as_str(), entry.position))
        .collect();

    events.sort_by(|a, b| {
        top_position(a, &positions)
            .cmp(&top_position(b, &positions))
            .then_with(|| played_at_order(a, b))
            .then_with(|| a.sequence_index.cmp(&b.sequence_index))
    });
    events
}

/// The better (smaller) of the two participants' baseline positions;
/// events resolving neither participant get the sentinel `u32::MAX` and
/// sort last.
fn top_position(event: &RoundEvent, positions: &HashMap<&str, u32>) -> u32 {
    let challenger = event
        .challenger_id
        .as_deref()
        .and_then(|id| positions.get(id).copied());
    let challenged = event
        .challenged_id
        .as_deref()
        .and_then(|id| positions.get(id).copied());

    match (challenger, challenged) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => u32::MAX,
    }
}

fn played_at_order(a: &RoundEvent, b: &RoundEvent) -> Ordering {
    match (a.played_at, b.played_at) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
