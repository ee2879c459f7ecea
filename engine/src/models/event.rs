//! Normalized round events.
//!
//! A `RoundEvent` is one challenge outcome prepared for settlement: the
//! participants, the outcome as a closed tagged union, the rule-bypass and
//! access-challenge markers, and the position hints captured at challenge
//! time. Participant and outcome fields stay optional so that incomplete
//! storage rows survive normalization and are rejected as violations inside
//! the settlement loop rather than dropped silently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a played (or forfeited) challenge.
///
/// Closed union dispatched through one exhaustive `match` in the settlement
/// loop; a one-sided walkover is recorded as a win for the present player
/// before it ever reaches this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Challenger won and takes the challenged player's position
    ChallengerWin,

    /// Challenger lost; drops by the challenge distance (or to last place
    /// for access challenges)
    ChallengerLoss,

    /// Neither player appeared; both drop one position
    DoubleWalkover,
}

/// One challenge outcome normalized for settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEvent {
    /// Dedup key: repeated events with the same id are processed once
    pub challenge_id: Option<String>,

    /// Challenger (lower-ranked side); `None` on incomplete rows
    pub challenger_id: Option<String>,

    /// Challenged (higher-ranked side); `None` on incomplete rows
    pub challenged_id: Option<String>,

    /// Decided outcome; `None` on incomplete rows
    pub outcome: Option<Outcome>,

    /// Access-band challenge: no distance limit, threshold check instead
    pub is_access_challenge: bool,

    /// Minimum challenged position for access challenges (ranking config)
    pub access_threshold: Option<u32>,

    /// Administrator-created: exempt from distance/threshold checks
    /// (never from position application)
    pub bypass_rules: bool,

    /// Challenger's position recorded at challenge time
    pub challenger_snapshot_position: Option<u32>,

    /// Challenged's position recorded at challenge time
    pub challenged_snapshot_position: Option<u32>,

    /// When the match was played; scheduling tie-break
    pub played_at: Option<DateTime<Utc>>,

    /// Original submission order; final scheduling tie-break
    pub sequence_index: usize,
}

impl RoundEvent {
    /// Create a complete event between two players.
    ///
    /// Collector-shaped rows with missing participants are built directly
    /// via struct literal; this constructor covers the common decided case.
    pub fn new(
        challenger_id: impl Into<String>,
        challenged_id: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            challenge_id: None,
            challenger_id: Some(challenger_id.into()),
            challenged_id: Some(challenged_id.into()),
            outcome: Some(outcome),
            is_access_challenge: false,
            access_threshold: None,
            bypass_rules: false,
            challenger_snapshot_position: None,
            challenged_snapshot_position: None,
            played_at: None,
            sequence_index: 0,
        }
    }

    /// Set the dedup key (builder pattern).
    pub fn with_challenge_id(mut self, id: impl Into<String>) -> Self {
        self.challenge_id = Some(id.into());
        self
    }

    /// Set position-at-challenge snapshots (builder pattern).
    pub fn with_snapshot_positions(
        mut self,
        challenger: Option<u32>,
        challenged: Option<u32>,
    ) -> Self {
        self.challenger_snapshot_position = challenger;
        self.challenged_snapshot_position = challenged;
        self
    }

    /// Mark as an access challenge with its threshold (builder pattern).
    pub fn access(mut self, threshold: Option<u32>) -> Self {
        self.is_access_challenge = true;
        self.access_threshold = threshold;
        self
    }

    /// Exempt from distance/threshold checks (builder pattern).
    pub fn bypassing_rules(mut self) -> Self {
        self.bypass_rules = true;
        self
    }

    /// Set the played-at timestamp (builder pattern).
    pub fn with_played_at(mut self, played_at: DateTime<Utc>) -> Self {
        self.played_at = Some(played_at);
        self
    }

    /// Set the submission order index (builder pattern).
    pub fn with_sequence_index(mut self, index: usize) -> Self {
        self.sequence_index = index;
        self
    }

    /// Both participants and the outcome are present.
    pub fn is_complete(&self) -> bool {
        self.challenger_id.is_some() && self.challenged_id.is_some() && self.outcome.is_some()
    }

    /// A printable reference for audit and violation messages: the challenge
    /// id when present, otherwise the participants.
    pub fn reference(&self) -> String {
        match &self.challenge_id {
            Some(id) => id.clone(),
            None => format!(
                "{} vs {}",
                self.challenger_id.as_deref().unwrap_or("?"),
                self.challenged_id.as_deref().unwrap_or("?")
            ),
        }
    }
}
