//! Settlement results, violations, and the audit trail.
//!
//! Violations are data, not exceptions: each rule breach is recorded here
//! and the offending event is simply excluded from the simulation, so the
//! rest of the batch is still evaluated. The caller treats any non-empty
//! violation list (without an explicit bypass) as a hard stop.

use crate::models::entry::LadderEntry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// A detected rule breach blocking automatic settlement unless bypassed.
///
/// Each variant carries enough context for the operator to locate and fix
/// the offending challenge (cancel or convert it, then retry the close).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Challenge row is missing the challenger, the challenged, or a
    /// decided outcome
    #[error("incomplete challenge {challenge_ref}: missing challenger, challenged, or outcome")]
    IncompleteEvent { challenge_ref: String },

    /// A participant does not exist in the period baseline
    #[error("player {player_id} in challenge {challenge_ref} is not part of the period baseline")]
    PlayerNotInBaseline {
        challenge_ref: String,
        player_id: String,
    },

    /// Challenger was not strictly below the challenged, or no coherent
    /// position ordering could be established
    #[error("invalid challenge order in {challenge_ref}: {challenger_id} must rank strictly below {challenged_id}")]
    InvalidChallengeOrder {
        challenge_ref: String,
        challenger_id: String,
        challenged_id: String,
    },

    /// Access challenge against a player above the access threshold
    #[error("access threshold violated in {challenge_ref}: challenged position {challenged_position} is above threshold {threshold}")]
    AccessThresholdViolation {
        challenge_ref: String,
        challenged_position: u32,
        threshold: u32,
    },

    /// Standard challenge across more positions than the ladder allows
    #[error("distance limit exceeded in {challenge_ref}: {distance} positions attempted, limit {limit}")]
    DistanceLimitExceeded {
        challenge_ref: String,
        distance: u32,
        limit: u32,
    },
}

/// Outcome of settling one period: the new order, a human-readable audit
/// trail, and every rule violation found.
///
/// The player-id set of `final_order` always equals the baseline's; only
/// positions change, and they are renumbered densely `1..=N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Settled ladder order, positions dense `1..=N`
    pub final_order: Vec<LadderEntry>,

    /// One line per applied event, in application order
    pub audit_log: Vec<String>,

    /// Deduplicated violations in first-seen order
    pub violations: Vec<Violation>,
}

impl SettlementResult {
    /// Whether the settlement may be committed without an explicit bypass.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations rendered as operator-facing strings.
    pub fn violation_messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }

    /// Deterministic SHA256 fingerprint of the result.
    ///
    /// Serialized through canonical JSON so identical `(baseline, events,
    /// config)` inputs always hash identically; used to verify the
    /// determinism and idempotent re-close properties.
    pub fn fingerprint(&self) -> String {
        let value = serde_json::to_value(self).expect("settlement result serializes to JSON");
        let canonical = canonicalize(value);
        let json =
            serde_json::to_string(&canonical).expect("canonical settlement result serializes");

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Recursively sort all object keys for a canonical JSON representation.
fn canonicalize(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    use std::collections::BTreeMap;

    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Append a violation, keeping the list deduplicated in first-seen order.
pub(crate) fn push_violation(violations: &mut Vec<Violation>, violation: Violation) {
    if !violations.contains(&violation) {
        violations.push(violation);
    }
}
