//! Array-backed ladder position engine.
//!
//! The simulator holds one period's ladder as a position-indexed array of
//! player ids plus a reverse id→index map for O(1) lookup. Every operation
//! is a bounded-length slice shift over the span between the player's old
//! and new slot; there is no linked structure and no allocation in the hot
//! path beyond the remove/insert pair.
//!
//! # Critical Invariants
//!
//! 1. **Density**: positions are exactly `1..=N` with no gaps or duplicates
//! 2. **Set preservation**: operations move players, never add or remove them
//! 3. **Bounded shifts**: each operation touches only the affected span
//!
//! State is ephemeral: a simulator is built from a baseline, driven by the
//! settlement loop, and discarded after `final_order()` is taken.

use crate::models::entry::LadderEntry;
use std::collections::HashMap;

/// In-memory ladder being settled.
///
/// # Example
/// ```
/// use ladder_settlement_core_rs::LadderSimulator;
///
/// let mut ladder = LadderSimulator::from_order(vec![
///     "alice".to_string(),
///     "bob".to_string(),
///     "carol".to_string(),
///     "dave".to_string(),
/// ]);
///
/// // dave beats bob and takes position 2
/// ladder.apply_victory("dave", 2);
/// assert_eq!(ladder.position_of("dave"), Some(2));
/// assert_eq!(ladder.position_of("bob"), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct LadderSimulator {
    /// Player ids by slot; `slots[i]` holds position `i + 1`
    slots: Vec<String>,

    /// Reverse map: player id → slot index
    index: HashMap<String, usize>,

    /// Successful defenses recorded this round, by player id.
    ///
    /// Recorded hook: tallied on every standard defeat, surfaced via
    /// [`defense_wins`](Self::defense_wins), consumed nowhere in this crate.
    defense_wins: HashMap<String, u32>,
}

impl LadderSimulator {
    /// Build a simulator from a top-to-bottom player order.
    ///
    /// # Panics
    /// Panics if the order contains a duplicate player id.
    pub fn from_order(order: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(order.len());
        for (slot, player_id) in order.iter().enumerate() {
            let previous = index.insert(player_id.clone(), slot);
            assert!(
                previous.is_none(),
                "duplicate player {} in ladder order",
                player_id
            );
        }

        Self {
            slots: order,
            index,
            defense_wins: HashMap::new(),
        }
    }

    /// Build a simulator from baseline entries, ordered by position.
    ///
    /// # Panics
    /// Panics if the baseline contains a duplicate player id.
    pub fn from_baseline(baseline: &[LadderEntry]) -> Self {
        let mut entries: Vec<&LadderEntry> = baseline.iter().collect();
        entries.sort_by(|a, b| a.position.cmp(&b.position));
        Self::from_order(entries.iter().map(|e| e.player_id.clone()).collect())
    }

    /// Number of players on the ladder.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the ladder is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a player is on the ladder.
    pub fn contains(&self, player_id: &str) -> bool {
        self.index.contains_key(player_id)
    }

    /// Current 1-based position of a player.
    pub fn position_of(&self, player_id: &str) -> Option<u32> {
        self.index.get(player_id).map(|slot| (slot + 1) as u32)
    }

    /// Challenger takes the target position; the span from the target down
    /// to the challenger's vacated slot shifts one step toward the bottom.
    ///
    /// The target is clamped to `1..=current position`, so a target at or
    /// below the challenger's current slot is a no-op.
    ///
    /// Returns the challenger's new position.
    ///
    /// # Panics
    /// Panics if the challenger is not on the ladder.
    pub fn apply_victory(&mut self, challenger_id: &str, target_position: u32) -> u32 {
        let from = self.slot_of(challenger_id);
        let to = (target_position.max(1) as usize - 1).min(from);

        if to < from {
            let player = self.slots.remove(from);
            self.slots.insert(to, player);
            self.reindex(to, from);
        }

        (to + 1) as u32
    }

    /// Challenger drops by `drop` positions, clamped to the bottom;
    /// intervening players shift up one step to close the gap.
    ///
    /// Returns the challenger's new position.
    ///
    /// # Panics
    /// Panics if the challenger is not on the ladder.
    pub fn apply_defeat(&mut self, challenger_id: &str, drop: u32) -> u32 {
        self.drop_player(challenger_id, drop)
    }

    /// Penalty drop: same shift mechanics as a defeat, used for walkovers
    /// (drop one) and lost access challenges (drop to last).
    ///
    /// Returns the player's new position.
    ///
    /// # Panics
    /// Panics if the player is not on the ladder.
    pub fn apply_penalty(&mut self, player_id: &str, drop: u32) -> u32 {
        self.drop_player(player_id, drop)
    }

    /// Record a successful defense for the challenged player.
    ///
    /// Position is unaffected; the tally is surfaced via
    /// [`defense_wins`](Self::defense_wins) for downstream consumers.
    pub fn mark_defense_win(&mut self, player_id: &str) {
        *self.defense_wins.entry(player_id.to_string()).or_insert(0) += 1;
    }

    /// Successful defenses recorded this round.
    pub fn defense_wins(&self) -> &HashMap<String, u32> {
        &self.defense_wins
    }

    /// The settled order, renumbered densely `1..=N`.
    pub fn final_order(&self) -> Vec<LadderEntry> {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, player_id)| LadderEntry::new(player_id.clone(), (slot + 1) as u32))
            .collect()
    }

    fn slot_of(&self, player_id: &str) -> usize {
        *self
            .index
            .get(player_id)
            .unwrap_or_else(|| panic!("player {} is not on the ladder", player_id))
    }

    fn drop_player(&mut self, player_id: &str, drop: u32) -> u32 {
        let from = self.slot_of(player_id);
        let to = (from + drop as usize).min(self.slots.len() - 1);

        if to > from {
            let player = self.slots.remove(from);
            self.slots.insert(to, player);
            self.reindex(from, to);
        }

        (to + 1) as u32
    }

    /// Rebuild the reverse map for the shifted span `lo..=hi`.
    fn reindex(&mut self, lo: usize, hi: usize) {
        for slot in lo..=hi {
            self.index.insert(self.slots[slot].clone(), slot);
        }
    }
}
