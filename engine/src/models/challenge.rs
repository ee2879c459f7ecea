//! Persisted challenge records.
//!
//! A `ChallengeRecord` is the storage-shaped row the host application keeps
//! per challenge: who challenged whom, when it was scheduled and played, the
//! recorded winner, per-side walkover flags, and the position-at-challenge
//! hints captured when the challenge was created. The collector normalizes
//! these rows into [`RoundEvent`](crate::RoundEvent)s for settlement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted challenge between two ladder players.
///
/// # Example
/// ```
/// use ladder_settlement_core_rs::ChallengeRecord;
/// use chrono::{TimeZone, Utc};
///
/// let scheduled = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
/// let record = ChallengeRecord::new("dave", "bob", scheduled)
///     .with_winner("dave")
///     .with_position_hints(Some(4), Some(2));
///
/// assert_eq!(record.winner_id.as_deref(), Some("dave"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    /// Unique challenge identifier (UUID)
    pub id: String,

    /// Challenger (the lower-ranked player issuing the challenge)
    pub challenger_id: String,

    /// Challenged (the higher-ranked player being challenged)
    pub challenged_id: String,

    /// When the challenge was scheduled (drives period assignment)
    pub scheduled_at: DateTime<Utc>,

    /// When the match was actually played, if it was
    pub played_at: Option<DateTime<Utc>>,

    /// Recorded winner, if the challenge has been decided
    pub winner_id: Option<String>,

    /// Challenger failed to appear
    pub challenger_walkover: bool,

    /// Challenged failed to appear
    pub challenged_walkover: bool,

    /// Challenger's ladder position recorded at challenge-creation time
    pub challenger_position_hint: Option<u32>,

    /// Challenged's ladder position recorded at challenge-creation time
    pub challenged_position_hint: Option<u32>,

    /// Challenge against the access band (no distance limit, loss drops to last)
    pub is_access_challenge: bool,

    /// Challenge was created by an administrator; exempt from
    /// distance/threshold checks at settlement
    pub created_by_admin: bool,
}

impl ChallengeRecord {
    /// Create an undecided challenge with a fresh UUID id.
    pub fn new(
        challenger_id: impl Into<String>,
        challenged_id: impl Into<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            challenger_id: challenger_id.into(),
            challenged_id: challenged_id.into(),
            scheduled_at,
            played_at: None,
            winner_id: None,
            challenger_walkover: false,
            challenged_walkover: false,
            challenger_position_hint: None,
            challenged_position_hint: None,
            is_access_challenge: false,
            created_by_admin: false,
        }
    }

    /// Record the winner (builder pattern).
    pub fn with_winner(mut self, winner_id: impl Into<String>) -> Self {
        self.winner_id = Some(winner_id.into());
        self
    }

    /// Record when the match was played (builder pattern).
    pub fn with_played_at(mut self, played_at: DateTime<Utc>) -> Self {
        self.played_at = Some(played_at);
        self
    }

    /// Record walkover flags for either side (builder pattern).
    pub fn with_walkovers(mut self, challenger: bool, challenged: bool) -> Self {
        self.challenger_walkover = challenger;
        self.challenged_walkover = challenged;
        self
    }

    /// Record position-at-challenge hints (builder pattern).
    pub fn with_position_hints(mut self, challenger: Option<u32>, challenged: Option<u32>) -> Self {
        self.challenger_position_hint = challenger;
        self.challenged_position_hint = challenged;
        self
    }

    /// Mark as an access challenge (builder pattern).
    pub fn access_challenge(mut self) -> Self {
        self.is_access_challenge = true;
        self
    }

    /// Mark as created by an administrator (builder pattern).
    pub fn created_by_admin(mut self) -> Self {
        self.created_by_admin = true;
        self
    }

    /// A challenge is decided once a winner is recorded or both sides
    /// walked over.
    pub fn is_decided(&self) -> bool {
        self.winner_id.is_some() || (self.challenger_walkover && self.challenged_walkover)
    }
}
