//! Baseline resolution: the ladder order in effect at period start.
//!
//! Settlement needs a trustworthy starting order even when the period was
//! never formally opened. The resolver walks a fallback chain from the most
//! to the least authoritative source and then persists its choice as the
//! period's Start snapshot, so every later run (and any re-close) starts
//! from the same baseline.
//!
//! Fallback chain:
//! 1. The period's persisted Start snapshot.
//! 2. The previous period's persisted End snapshot.
//! 3. An order inferred from position-at-challenge hints on challenges
//!    scheduled within the period.
//! 4. The current live membership order.

use crate::models::entry::{LadderEntry, Period, SnapshotKind};
use crate::models::member::{live_order, MemberRecord};
use crate::store::RankingStore;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while resolving a baseline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaselineError {
    /// No snapshot, no hints, and no members: there is nothing to settle.
    #[error("ranking {ranking_id} has no members; nothing to settle")]
    NoMembers { ranking_id: String },
}

/// Resolve the baseline order for a period and persist it as the Start
/// snapshot.
///
/// Idempotent: once a Start snapshot exists, every call returns it
/// unchanged.
///
/// # Errors
/// [`BaselineError::NoMembers`] when the ranking has no members at all;
/// unlike rule violations this is fatal, since no meaningful settlement
/// output exists.
pub fn resolve<S: RankingStore>(
    store: &mut S,
    ranking_id: &str,
    period: Period,
) -> Result<Vec<LadderEntry>, BaselineError> {
    if let Some(snapshot) = non_empty(store.baseline_snapshot(ranking_id, period, SnapshotKind::Start))
    {
        tracing::debug!(%ranking_id, %period, "baseline from existing start snapshot");
        return Ok(snapshot);
    }

    if let Some(snapshot) = non_empty(store.baseline_snapshot(
        ranking_id,
        period.previous(),
        SnapshotKind::End,
    )) {
        tracing::debug!(%ranking_id, %period, "baseline from previous period end snapshot");
        store.persist_baseline_snapshot(ranking_id, period, SnapshotKind::Start, &snapshot);
        return Ok(snapshot);
    }

    let members = store.active_members(ranking_id);
    if members.is_empty() {
        return Err(BaselineError::NoMembers {
            ranking_id: ranking_id.to_string(),
        });
    }

    let hints = position_hints(store, ranking_id, period);
    let resolved = if hints.is_empty() {
        tracing::debug!(%ranking_id, %period, "baseline from live membership order");
        from_live_order(&members)
    } else {
        tracing::debug!(%ranking_id, %period, hinted = hints.len(), "baseline inferred from challenge hints");
        from_hints(&members, &hints)
    };

    store.persist_baseline_snapshot(ranking_id, period, SnapshotKind::Start, &resolved);
    Ok(resolved)
}

fn non_empty(snapshot: Option<Vec<LadderEntry>>) -> Option<Vec<LadderEntry>> {
    snapshot.filter(|entries| !entries.is_empty())
}

/// Minimum hinted position per player, mined from challenges scheduled in
/// the period.
fn position_hints<S: RankingStore>(
    store: &S,
    ranking_id: &str,
    period: Period,
) -> HashMap<String, u32> {
    let mut hints: HashMap<String, u32> = HashMap::new();

    for record in store.scheduled_challenges(ranking_id, period.window()) {
        let pairs = [
            (record.challenger_id.clone(), record.challenger_position_hint),
            (record.challenged_id.clone(), record.challenged_position_hint),
        ];

        for (player_id, hint) in pairs {
            if let Some(position) = hint {
                hints
                    .entry(player_id)
                    .and_modify(|current| *current = (*current).min(position))
                    .or_insert(position);
            }
        }
    }

    hints
}

/// Members with hints sorted ascending by minimum hinted position (ties by
/// live position, then id); hintless members appended in live order.
fn from_hints(members: &[MemberRecord], hints: &HashMap<String, u32>) -> Vec<LadderEntry> {
    let ordered = live_order(members);
    let (mut hinted, hintless): (Vec<&MemberRecord>, Vec<&MemberRecord>) = ordered
        .iter()
        .partition(|m| hints.contains_key(&m.player_id));

    hinted.sort_by(|a, b| {
        hints[&a.player_id]
            .cmp(&hints[&b.player_id])
            .then_with(|| a.live_position.cmp(&b.live_position))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    renumber(hinted.into_iter().chain(hintless))
}

/// Live membership order: stored position ascending, ties by id.
fn from_live_order(members: &[MemberRecord]) -> Vec<LadderEntry> {
    let ordered = live_order(members);
    renumber(ordered.iter())
}

fn renumber<'a>(members: impl Iterator<Item = &'a MemberRecord>) -> Vec<LadderEntry> {
    members
        .enumerate()
        .map(|(slot, member)| LadderEntry::new(member.player_id.clone(), (slot + 1) as u32))
        .collect()
}
